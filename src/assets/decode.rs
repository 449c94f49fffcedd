use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::RasterImage;

/// Decode an encoded raster (PNG, JPEG, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CardResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let img = RasterImage::from_rgba_image(dyn_img.to_rgba8());
    if img.width == 0 || img.height == 0 {
        return Err(CardError::asset("decoded image has zero size"));
    }
    Ok(img)
}

/// Parse an SVG document.
pub fn parse_svg(bytes: &[u8]) -> CardResult<Arc<usvg::Tree>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(Arc::new(tree))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
