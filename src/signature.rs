//! Freehand signature capture.
//!
//! The surface is the only record of what was drawn: no vector history is kept. A stroke is a
//! chain of independent line segments, each drawn from the previous sample to the current one.

use vello_cpu::kurbo::{BezPath, Cap, Circle, Join, Shape as _, Stroke};

use crate::foundation::core::{Point, Rgba8, SurfaceSize};
use crate::foundation::error::CardResult;
use crate::render::surface::{RasterImage, Surface};

/// Ink width in surface units.
pub const STROKE_WIDTH: f64 = 2.0;
/// Ink color.
pub const STROKE_COLOR: Rgba8 = Rgba8::INK;

/// A pointer position as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSample {
    /// Mouse-style input, already relative to the surface.
    Mouse {
        /// Surface-relative offset.
        offset: Point,
    },
    /// Touch input in viewport coordinates.
    Touch {
        /// First touch point in viewport space.
        client: Point,
        /// Viewport-relative origin of the surface.
        surface_origin: Point,
    },
}

impl PointerSample {
    /// Surface-local coordinates of this sample.
    pub fn resolve(self) -> Point {
        match self {
            Self::Mouse { offset } => offset,
            Self::Touch {
                client,
                surface_origin,
            } => Point::new(client.x - surface_origin.x, client.y - surface_origin.y),
        }
    }

    /// `true` for touch input.
    pub fn is_touch(self) -> bool {
        matches!(self, Self::Touch { .. })
    }
}

/// Host input events the recorder listens to.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer-down or touch-start.
    Down(PointerSample),
    /// Pointer or touch movement.
    Move(PointerSample),
    /// Pointer-up or touch-end. Touch-end carries no position.
    Up {
        /// `true` when the event came from touch input.
        touch: bool,
    },
    /// Pointer left the surface.
    Leave,
}

/// What the host should do with the event after the recorder saw it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// Suppress default scrolling/zooming. Set for every touch event.
    pub suppress_default: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum StrokeState {
    Idle,
    Drawing { last: Point },
}

/// Two-state (idle/drawing) freehand recorder over its own surface.
#[derive(Debug)]
pub struct StrokeRecorder {
    surface: Surface,
    state: StrokeState,
}

impl StrokeRecorder {
    /// Create a recorder with a blank surface of `size`.
    pub fn new(size: SurfaceSize) -> CardResult<Self> {
        Ok(Self {
            surface: Surface::new(size)?,
            state: StrokeState::Idle,
        })
    }

    /// Idle -> Drawing, anchored at `point`.
    pub fn begin(&mut self, point: Point) {
        tracing::debug!(x = point.x, y = point.y, "signature stroke begin");
        self.state = StrokeState::Drawing { last: point };
    }

    /// Draw a segment from the last sample to `point`. No-op while idle.
    pub fn extend(&mut self, point: Point) -> CardResult<()> {
        let StrokeState::Drawing { last } = self.state else {
            return Ok(());
        };
        self.surface
            .draw_with(|ctx| draw_segment(ctx, last, point))?;
        self.state = StrokeState::Drawing { last: point };
        Ok(())
    }

    /// Drawing -> Idle. Safe from either state.
    pub fn end(&mut self) {
        if self.is_drawing() {
            tracing::debug!("signature stroke end");
        }
        self.state = StrokeState::Idle;
    }

    /// Dispatch a host event, returning whether its default action must be suppressed.
    pub fn handle(&mut self, event: InputEvent) -> CardResult<InputOutcome> {
        let touch = match event {
            InputEvent::Down(sample) => {
                self.begin(sample.resolve());
                sample.is_touch()
            }
            InputEvent::Move(sample) => {
                self.extend(sample.resolve())?;
                sample.is_touch()
            }
            InputEvent::Up { touch } => {
                self.end();
                touch
            }
            InputEvent::Leave => {
                self.end();
                false
            }
        };
        Ok(InputOutcome {
            suppress_default: touch,
        })
    }

    /// Reset the surface to blank, independent of drawing state.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// `true` when nothing has been drawn since creation or the last clear.
    pub fn is_blank(&self) -> bool {
        self.surface.is_blank()
    }

    /// `true` while a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Last recorded sample while drawing.
    pub fn last_point(&self) -> Option<Point> {
        match self.state {
            StrokeState::Drawing { last } => Some(last),
            StrokeState::Idle => None,
        }
    }

    /// Backing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Copy of the current ink, used as the card's signature image.
    pub fn snapshot(&self) -> RasterImage {
        self.surface.snapshot()
    }
}

fn draw_segment(ctx: &mut vello_cpu::RenderContext, from: Point, to: Point) -> CardResult<()> {
    let a = vello_cpu::kurbo::Point::new(from.x, from.y);
    let b = vello_cpu::kurbo::Point::new(to.x, to.y);
    ctx.set_paint(STROKE_COLOR.to_peniko());

    // Zero-length segments still leave a round dot, as a round cap would.
    if a == b {
        ctx.fill_path(&Circle::new(a, STROKE_WIDTH / 2.0).to_path(0.1));
        return Ok(());
    }

    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    ctx.set_stroke(
        Stroke::new(STROKE_WIDTH)
            .with_caps(Cap::Round)
            .with_join(Join::Round),
    );
    ctx.stroke_path(&path);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/signature/recorder.rs"]
mod tests;
