/// Image and SVG decoding.
pub mod decode;
/// The decorative asset set.
pub mod store;
/// SVG rasterization.
pub mod svg_raster;
