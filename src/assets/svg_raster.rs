use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::RasterImage;

// Decorative SVGs are drawn at most a few hundred pixels wide; anything past this is a
// malformed document rather than a real asset.
const MAX_DIM: u32 = 16_384;

/// Rasterize `tree` into a premultiplied image of exactly `width`x`height`.
///
/// The document is stretched non-uniformly to the target box, matching how raster assets are
/// drawn into their slots.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> CardResult<RasterImage> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(CardError::asset(format!(
            "svg raster size out of range: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(CardError::asset("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    // tiny-skia pixmaps are premultiplied RGBA8 already.
    RasterImage::from_premul(width, height, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
