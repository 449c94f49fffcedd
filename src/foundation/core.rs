use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Create a size without validation.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Validate that both sides are non-zero and fit the raster backend (`u16`).
    pub fn validate(self) -> CardResult<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return Err(CardError::validation(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| CardError::validation("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| CardError::validation("surface height exceeds u16"))?;
        Ok((w, h))
    }

    /// Full-surface rectangle in pixel space.
    pub fn bounds(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

/// Integer rectangle `{x, y, width, height}` in surface-local pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when `self` lies entirely inside `size`.
    pub fn fits_in(self, size: SurfaceSize) -> bool {
        self.right() <= size.width && self.bottom() <= size.height
    }

    /// Convert to a floating-point rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(0xff, 0xff, 0xff);
    /// Near-black ink used for body text and signature strokes (`#222`).
    pub const INK: Self = Self::opaque(0x22, 0x22, 0x22);
    /// Header green (`#217346`).
    pub const HEADER_GREEN: Self = Self::opaque(0x21, 0x73, 0x46);
    /// Selection accent (`#007b3a`).
    pub const ACCENT: Self = Self::opaque(0x00, 0x7b, 0x3a);

    /// Opaque color from components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    pub(crate) fn to_peniko(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
