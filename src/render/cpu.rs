//! CPU rasterization of a [`CardScene`].

use crate::card::scene::{CardScene, FontWeight, SceneElement, TextAlign, TextRun};
use crate::foundation::core::Rect;
use crate::foundation::error::{CardError, CardResult};
use crate::render::backend::FrameRGBA;
use crate::render::resources::{ResourceJoin, SlotState};
use crate::render::surface::RasterImage;
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};

/// Largest supported render and export scale factor.
pub const MAX_SCALE: u32 = 4;

/// Renders card scenes with `vello_cpu`.
///
/// Without a text engine, text runs are skipped and only fills and images are drawn.
#[derive(Debug, Default)]
pub struct CpuRenderer {
    text: Option<TextLayoutEngine>,
}

impl CpuRenderer {
    /// Renderer that draws text with `text`.
    pub fn new(text: Option<TextLayoutEngine>) -> Self {
        Self { text }
    }

    /// Renderer using the bundled DejaVu Sans faces for text.
    pub fn with_bundled_font() -> CardResult<Self> {
        Ok(Self::new(Some(TextLayoutEngine::bundled()?)))
    }

    /// `true` when text runs will be drawn.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Render `scene` at `scale` times its nominal size.
    #[tracing::instrument(skip(self, scene, resources))]
    pub fn render(
        &mut self,
        scene: &CardScene,
        resources: &ResourceJoin,
        scale: u32,
    ) -> CardResult<FrameRGBA> {
        if scale == 0 || scale > MAX_SCALE {
            return Err(CardError::validation(format!(
                "render scale must be in 1..={MAX_SCALE}, got {scale}"
            )));
        }
        let width = scene.size.width.saturating_mul(scale);
        let height = scene.size.height.saturating_mul(scale);
        let w: u16 = width
            .try_into()
            .map_err(|_| CardError::render("frame width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CardError::render("frame height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(CardError::render("frame must be non-empty"));
        }

        if self.text.is_none() && scene.texts().next().is_some() {
            tracing::warn!("no font configured; card text is not drawn");
        }

        let root = vello_cpu::kurbo::Affine::scale(f64::from(scale));
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for (i, element) in scene.elements.iter().enumerate() {
            ctx.set_transform(root);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match element {
                SceneElement::Fill { rect, color } => {
                    ctx.set_paint(color.to_peniko());
                    ctx.fill_rect(&rect_to_cpu(*rect));
                }
                SceneElement::Image { rect, clip, .. } => match resources.slot(i) {
                    Some(SlotState::Ready(img)) => draw_image(&mut ctx, root, img, *rect, *clip)?,
                    Some(SlotState::Failed(_)) | None => {}
                },
                SceneElement::Text(run) => {
                    if let Some(engine) = self.text.as_mut() {
                        draw_text(&mut ctx, root, engine, run)?;
                    }
                }
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    root: vello_cpu::kurbo::Affine,
    img: &RasterImage,
    rect: Rect,
    clip: bool,
) -> CardResult<()> {
    if img.width == 0 || img.height == 0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Ok(());
    }
    let dest = rect_to_cpu(rect);
    if clip {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to((dest.x0, dest.y0));
        path.line_to((dest.x1, dest.y0));
        path.line_to((dest.x1, dest.y1));
        path.line_to((dest.x0, dest.y1));
        path.close_path();
        ctx.push_clip_layer(&path);
    }

    let sx = rect.width() / f64::from(img.width);
    let sy = rect.height() / f64::from(img.height);
    ctx.set_transform(
        root * vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
    );
    ctx.set_paint(img.to_paint()?);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));

    if clip {
        ctx.pop_layer();
    }
    Ok(())
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    root: vello_cpu::kurbo::Affine,
    engine: &mut TextLayoutEngine,
    run: &TextRun,
) -> CardResult<()> {
    if run.text.is_empty() {
        return Ok(());
    }
    let brush = TextBrushRgba8 {
        r: run.color.r,
        g: run.color.g,
        b: run.color.b,
        a: run.color.a,
    };
    let bold = run.weight == FontWeight::Bold;
    let layout = engine.layout_line(&run.text, run.size_px, bold, brush)?;
    let Some(first) = layout.lines().next() else {
        return Ok(());
    };
    // Layout coordinates put the top of the line box at y = 0.
    let ascent = f64::from(first.metrics().baseline);
    let x = match run.align {
        TextAlign::Left => run.x,
        TextAlign::Right => run.x - f64::from(layout.width()),
    };
    ctx.set_transform(root * vello_cpu::kurbo::Affine::translate((x, run.baseline - ascent)));

    let font = engine.font(bold).clone();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };

            let brush = glyph_run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(glyph_run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
