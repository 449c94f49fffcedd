//! Addressable premultiplied RGBA8 pixel buffers.
//!
//! A [`Surface`] is the drawing target for signatures, crop backdrops and card previews. Drawing
//! goes through a reusable `vello_cpu::RenderContext`. Since `vello_cpu` renders into a fresh
//! buffer, accumulating draws land in a scratch pixmap first and are source-over composited onto
//! the surface.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::core::{PixelRect, SurfaceSize};
use crate::foundation::error::{CardError, CardResult};
use crate::render::composite::{over_in_place, premultiply_in_place, unpremultiply_in_place};

/// An immutable raster image in premultiplied RGBA8 form.
///
/// Cheap to clone: pixel bytes are shared. This is the artifact type handed between steps
/// (signature snapshot, cropped photo, decoded uploads, decorative assets).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied bytes, checking the length against the dimensions.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> CardResult<Self> {
        if rgba8_premul.len() != byte_len(width, height) {
            return Err(CardError::render(format!(
                "raster byte len mismatch: {} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build from a straight-alpha `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut bytes = img.into_raw();
        premultiply_in_place(&mut bytes);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    /// Size of the image.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Convert to a straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        let mut bytes = self.rgba8_premul.as_ref().clone();
        unpremultiply_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| CardError::render("raster dimensions do not match pixel buffer"))
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> CardResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Encode as an embeddable `data:image/png;base64,...` resource.
    pub fn to_data_url(&self) -> CardResult<String> {
        let png = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    pub(crate) fn to_pixmap(&self) -> CardResult<vello_cpu::Pixmap> {
        pixmap_from_premul_bytes(&self.rgba8_premul, self.width, self.height)
    }

    pub(crate) fn to_paint(&self) -> CardResult<vello_cpu::Image> {
        let pixmap = self.to_pixmap()?;
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }
}

/// A mutable drawing surface.
pub struct Surface {
    size: SurfaceSize,
    pixmap: vello_cpu::Pixmap,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(size: SurfaceSize) -> CardResult<Self> {
        let (w, h) = size.validate()?;
        Ok(Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
            scratch: None,
            ctx: None,
        })
    }

    /// Allocate a surface holding a copy of `image`.
    pub fn from_image(image: &RasterImage) -> CardResult<Self> {
        image.size().validate()?;
        Ok(Self {
            size: image.size(),
            pixmap: image.to_pixmap()?,
            scratch: None,
            ctx: None,
        })
    }

    /// Surface dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Reset every pixel to zero.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// `true` iff every pixel, read as one packed 32-bit value, is zero.
    pub fn is_blank(&self) -> bool {
        self.pixels()
            .chunks_exact(4)
            .all(|px| u32::from_ne_bytes([px[0], px[1], px[2], px[3]]) == 0)
    }

    /// Overwrite this surface with the pixels of `other` (same size required).
    pub fn copy_from(&mut self, other: &Surface) -> CardResult<()> {
        if self.size != other.size {
            return Err(CardError::render("copy_from expects equal-size surfaces"));
        }
        self.pixmap
            .data_as_u8_slice_mut()
            .copy_from_slice(other.pixels());
        Ok(())
    }

    /// Draw on top of the current content.
    pub fn draw_with(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CardResult<()>,
    ) -> CardResult<()> {
        let (w, h) = self.size.validate()?;
        let mut scratch = match self.scratch.take() {
            Some(pm) => pm,
            None => vello_cpu::Pixmap::new(w, h),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        self.render_into(&mut scratch, f)?;
        over_in_place(self.pixmap.data_as_u8_slice_mut(), scratch.data_as_u8_slice())?;
        self.scratch = Some(scratch);
        Ok(())
    }

    /// Clear, then draw. The previous content is discarded.
    pub fn replace_with(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CardResult<()>,
    ) -> CardResult<()> {
        let mut pixmap = std::mem::replace(&mut self.pixmap, vello_cpu::Pixmap::new(1, 1));
        pixmap.data_as_u8_slice_mut().fill(0);
        let out = self.render_into(&mut pixmap, f);
        self.pixmap = pixmap;
        out
    }

    fn render_into(
        &mut self,
        dst: &mut vello_cpu::Pixmap,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CardResult<()>,
    ) -> CardResult<()> {
        let (w, h) = self.size.validate()?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        f(&mut ctx)?;
        ctx.flush();
        ctx.render_to_pixmap(dst);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Read back the pixels inside `rect`, which must lie inside the surface.
    pub fn read_region(&self, rect: PixelRect) -> CardResult<RasterImage> {
        if !rect.fits_in(self.size) {
            return Err(CardError::render(format!(
                "region {rect:?} exceeds surface {}x{}",
                self.size.width, self.size.height
            )));
        }
        let stride = (self.size.width as usize) * 4;
        let row_len = (rect.width as usize) * 4;
        let src = self.pixels();
        let mut out = Vec::with_capacity(byte_len(rect.width, rect.height));
        for row in rect.y..rect.bottom() {
            let start = (row as usize) * stride + (rect.x as usize) * 4;
            out.extend_from_slice(&src[start..start + row_len]);
        }
        RasterImage::from_premul(rect.width, rect.height, out)
    }

    /// Copy the whole surface into an immutable image.
    pub fn snapshot(&self) -> RasterImage {
        RasterImage {
            width: self.size.width,
            height: self.size.height,
            rgba8_premul: Arc::new(self.pixels().to_vec()),
        }
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("pixmap height exceeds u16"))?;
    if bytes.len() != byte_len(width, height) {
        return Err(CardError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
