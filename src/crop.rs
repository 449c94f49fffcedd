//! Rectangular photo cropping.
//!
//! An uploaded image is scaled to cover the crop surface and centered; the user drags a
//! rectangle over it and the covered pixels are extracted into a standalone image. The backdrop
//! lives in its own surface so the selection outline, drawn on the display surface only, never
//! leaks into the extracted pixels.

use crate::assets::decode::decode_image;
use crate::foundation::core::{PixelRect, Point, Rect, Rgba8, SurfaceSize};
use crate::foundation::error::{CardResult, Rejection};
use crate::render::surface::{RasterImage, Surface};

/// Outline width of the selection rectangle.
pub const OUTLINE_WIDTH: f64 = 1.0;
/// Outline color of the selection rectangle.
pub const OUTLINE_COLOR: Rgba8 = Rgba8::ACCENT;

/// Where a source image lands on the crop surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverPlacement {
    /// Uniform scale applied to the source.
    pub scale: f64,
    /// Destination rectangle in surface space; may overflow the surface on one axis.
    pub dest: Rect,
}

/// Scale-to-cover: `max(sw/iw, sh/ih)`, centered with equal overflow on opposite sides.
pub fn cover_placement(surface: SurfaceSize, image: SurfaceSize) -> CoverPlacement {
    let sw = f64::from(surface.width);
    let sh = f64::from(surface.height);
    let iw = f64::from(image.width.max(1));
    let ih = f64::from(image.height.max(1));
    let scale = (sw / iw).max(sh / ih);
    let w = iw * scale;
    let h = ih * scale;
    let x = (sw - w) / 2.0;
    let y = (sh - h) / 2.0;
    CoverPlacement {
        scale,
        dest: Rect::new(x, y, x + w, y + h),
    }
}

/// Normalized selection between two drag endpoints.
///
/// Both points are clamped into the surface and snapped to the pixel grid, so the result is
/// always contained in `bounds`. Its top-left is the coordinate-wise minimum of the endpoints.
pub fn normalize_selection(anchor: Point, point: Point, bounds: SurfaceSize) -> PixelRect {
    let snap = |v: f64, max: u32| -> u32 {
        if v.is_nan() {
            return 0;
        }
        v.round().clamp(0.0, f64::from(max)) as u32
    };
    let (ax, ay) = (snap(anchor.x, bounds.width), snap(anchor.y, bounds.height));
    let (px, py) = (snap(point.x, bounds.width), snap(point.y, bounds.height));
    PixelRect::new(ax.min(px), ay.min(py), ax.abs_diff(px), ay.abs_diff(py))
}

/// Handle for an in-flight source decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Result of completing a source load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The decoded image became the current source.
    Applied,
    /// A newer load was started meanwhile; the result was dropped.
    Superseded,
}

/// Interaction phase of the selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropPhase {
    /// No drag in progress.
    NoSelection,
    /// A drag is in progress.
    Selecting,
    /// A drag finished and produced a pending cropped image.
    Confirmed,
}

#[derive(Clone, Copy, Debug)]
enum Drag {
    Idle,
    Active {
        anchor: Point,
        rect: Option<PixelRect>,
    },
    Done,
}

#[derive(Debug)]
struct Source {
    image: RasterImage,
    placement: CoverPlacement,
}

/// Crop interaction state for one form instance.
#[derive(Debug)]
pub struct CropSelector {
    size: SurfaceSize,
    backdrop: Surface,
    display: Surface,
    source: Option<Source>,
    drag: Drag,
    selection: Option<PixelRect>,
    pending: Option<RasterImage>,
    interface_visible: bool,
    generation: u64,
}

impl CropSelector {
    /// Create a selector with an empty crop surface of `size`.
    pub fn new(size: SurfaceSize) -> CardResult<Self> {
        Ok(Self {
            size,
            backdrop: Surface::new(size)?,
            display: Surface::new(size)?,
            source: None,
            drag: Drag::Idle,
            selection: None,
            pending: None,
            interface_visible: false,
            generation: 0,
        })
    }

    /// Start a source load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Apply a finished decode if `ticket` is still the latest one.
    ///
    /// Decode errors for the current ticket are returned; the previous source stays in place.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        decoded: CardResult<RasterImage>,
    ) -> CardResult<LoadOutcome> {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "stale source load dropped");
            return Ok(LoadOutcome::Superseded);
        }
        self.set_source(decoded?)?;
        Ok(LoadOutcome::Applied)
    }

    /// Replace the source with an already decoded image.
    pub fn load_source(&mut self, image: RasterImage) -> CardResult<()> {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok(image)).map(|_| ())
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) and make them the source.
    pub fn load_source_bytes(&mut self, bytes: &[u8]) -> CardResult<()> {
        let ticket = self.begin_load();
        self.complete_load(ticket, decode_image(bytes)).map(|_| ())
    }

    fn set_source(&mut self, image: RasterImage) -> CardResult<()> {
        let placement = cover_placement(self.size, image.size());
        tracing::debug!(
            width = image.width,
            height = image.height,
            scale = placement.scale,
            "crop source loaded"
        );
        let paint = image.to_paint()?;
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        self.backdrop.replace_with(|ctx| {
            ctx.set_transform(
                vello_cpu::kurbo::Affine::translate((placement.dest.x0, placement.dest.y0))
                    * vello_cpu::kurbo::Affine::scale(placement.scale),
            );
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            Ok(())
        })?;
        self.display.copy_from(&self.backdrop)?;
        self.source = Some(Source { image, placement });
        self.drag = Drag::Idle;
        self.selection = None;
        self.pending = None;
        self.interface_visible = true;
        Ok(())
    }

    /// Anchor a new drag at `point`.
    pub fn start_selection(&mut self, point: Point) {
        self.drag = Drag::Active {
            anchor: point,
            rect: None,
        };
        self.selection = None;
    }

    /// Recompute the rectangle and redraw backdrop plus outline. No-op outside a drag.
    pub fn update_selection(&mut self, point: Point) -> CardResult<()> {
        let Drag::Active { anchor, .. } = self.drag else {
            return Ok(());
        };
        let rect = normalize_selection(anchor, point, self.size);
        self.drag = Drag::Active {
            anchor,
            rect: Some(rect),
        };
        self.selection = Some(rect);

        self.display.copy_from(&self.backdrop)?;
        let outline = rect.to_rect();
        self.display.draw_with(|ctx| {
            ctx.set_paint(OUTLINE_COLOR.to_peniko());
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(OUTLINE_WIDTH));
            ctx.stroke_rect(&vello_cpu::kurbo::Rect::new(
                outline.x0, outline.y0, outline.x1, outline.y1,
            ));
            Ok(())
        })
    }

    /// Finish the drag at `point` and extract the selected pixels as the pending crop.
    ///
    /// Returns `None` (and resets to no selection) when no rectangle was formed, the rectangle
    /// has zero area, or no source is loaded. An earlier pending crop is kept in that case.
    pub fn confirm_selection(&mut self, point: Point) -> CardResult<Option<RasterImage>> {
        let Drag::Active {
            rect: Some(_),
            ..
        } = self.drag
        else {
            self.drag = Drag::Idle;
            return Ok(None);
        };
        self.update_selection(point)?;
        let Some(rect) = self.selection else {
            self.drag = Drag::Idle;
            return Ok(None);
        };
        if rect.is_empty() || self.source.is_none() {
            tracing::debug!(?rect, has_source = self.source.is_some(), "crop aborted");
            self.drag = Drag::Idle;
            return Ok(None);
        }

        let region = self.backdrop.read_region(rect)?;
        let cropped = Surface::from_image(&region)?.snapshot();
        tracing::debug!(?rect, "crop extracted");
        self.pending = Some(cropped.clone());
        self.drag = Drag::Done;
        Ok(Some(cropped))
    }

    /// Explicit user confirmation of the pending crop. Hides the crop interface.
    pub fn accept(&mut self) -> CardResult<RasterImage> {
        let Some(photo) = self.pending.clone() else {
            return Err(Rejection::CropNotSelected.into());
        };
        self.interface_visible = false;
        Ok(photo)
    }

    /// Current phase.
    pub fn phase(&self) -> CropPhase {
        match self.drag {
            Drag::Idle => CropPhase::NoSelection,
            Drag::Active { .. } => CropPhase::Selecting,
            Drag::Done => CropPhase::Confirmed,
        }
    }

    /// Last computed selection rectangle.
    pub fn selection(&self) -> Option<PixelRect> {
        self.selection
    }

    /// Pending cropped image shown as preview.
    pub fn preview(&self) -> Option<&RasterImage> {
        self.pending.as_ref()
    }

    /// Current source image.
    pub fn source(&self) -> Option<&RasterImage> {
        self.source.as_ref().map(|s| &s.image)
    }

    /// Placement of the current source on the crop surface.
    pub fn placement(&self) -> Option<CoverPlacement> {
        self.source.as_ref().map(|s| s.placement)
    }

    /// Clean backdrop (scaled source only).
    pub fn backdrop(&self) -> &Surface {
        &self.backdrop
    }

    /// What the user sees: backdrop plus selection outline.
    pub fn display(&self) -> &Surface {
        &self.display
    }

    /// `true` between a source load and acceptance.
    pub fn interface_visible(&self) -> bool {
        self.interface_visible
    }
}

#[cfg(test)]
#[path = "../tests/unit/crop/selector.rs"]
mod tests;
