/// Rendered frame type.
pub mod backend;
/// Premultiplied source-over blending.
pub mod composite;
/// Scene rasterization with `vello_cpu`.
pub mod cpu;
/// Image resolution ahead of rendering.
pub mod resources;
/// Pixel surfaces and raster images.
pub mod surface;
/// Text shaping with `parley`.
pub mod text;
