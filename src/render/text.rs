use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CardError, CardResult};

const BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Parley contexts plus one registered font family used for every text run on the card.
///
/// The family holds a regular face and, optionally, a bold face. Bold runs fall back to the
/// regular face when no bold face was registered.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    regular: vello_cpu::peniko::FontData,
    bold: Option<vello_cpu::peniko::FontData>,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TextLayoutEngine {
    /// Register `font_bytes` (TTF/OTF) and build fresh layout contexts.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family_name = register_family(&mut font_ctx, font_bytes.clone())?;

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            regular: font_data(font_bytes),
            bold: None,
        })
    }

    /// The DejaVu Sans regular and bold faces shipped in `assets/fonts`.
    pub fn bundled() -> CardResult<Self> {
        Self::from_font_bytes(BUNDLED_REGULAR.to_vec())?.with_bold_bytes(BUNDLED_BOLD.to_vec())
    }

    /// Add a bold face. It must belong to the already registered family.
    pub fn with_bold_bytes(mut self, font_bytes: Vec<u8>) -> CardResult<Self> {
        let family_name = register_family(&mut self.font_ctx, font_bytes.clone())?;
        if family_name != self.family_name {
            return Err(CardError::asset(format!(
                "bold face family '{family_name}' does not match '{}'",
                self.family_name
            )));
        }
        self.bold = Some(font_data(font_bytes));
        Ok(self)
    }

    /// Read and register a font file.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    /// Registered family name.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// `true` when a separate bold face is registered.
    pub fn has_bold(&self) -> bool {
        self.bold.is_some()
    }

    /// Face whose glyph ids match a layout shaped with `bold`.
    pub(crate) fn font(&self, bold: bool) -> &vello_cpu::peniko::FontData {
        match &self.bold {
            Some(face) if bold => face,
            _ => &self.regular,
        }
    }

    /// Shape a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        bold: bool,
        brush: TextBrushRgba8,
    ) -> CardResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn register_family(font_ctx: &mut parley::FontContext, font_bytes: Vec<u8>) -> CardResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(font_bytes), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CardError::asset("no font families registered from font bytes"))?;
    Ok(font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| CardError::asset("registered font family has no name"))?
        .to_string())
}

fn font_data(font_bytes: Vec<u8>) -> vello_cpu::peniko::FontData {
    vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
