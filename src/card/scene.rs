//! Retained description of the composed card.
//!
//! The scene is the single source of truth for what the card looks like; both the on-screen
//! preview and the exported PNG are rendered from it.

use crate::assets::store::DecorativeAsset;
use crate::foundation::core::{Rect, Rgba8, SurfaceSize};

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// `x` is the left edge.
    Left,
    /// `x` is the right edge.
    Right,
}

/// Font weight of a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Regular weight.
    Regular,
    /// Bold weight.
    Bold,
}

/// A single line of text positioned by its baseline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextRun {
    /// Text to draw, already in its final case.
    pub text: String,
    /// Anchor x (meaning depends on `align`).
    pub x: f64,
    /// Baseline y.
    pub baseline: f64,
    /// Font size in pixels.
    pub size_px: f32,
    /// Weight.
    pub weight: FontWeight,
    /// Alignment.
    pub align: TextAlign,
    /// Fill color.
    pub color: Rgba8,
}

/// Which image fills an image slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// The holder's cropped photo.
    Photo,
    /// The holder's signature.
    Signature,
    /// A fixed decorative asset.
    Asset(DecorativeAsset),
}

/// One drawable element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneElement {
    /// Solid rectangle.
    Fill {
        /// Area.
        rect: Rect,
        /// Color.
        color: Rgba8,
    },
    /// Text line.
    Text(TextRun),
    /// Image stretched to `rect`.
    Image {
        /// Image to draw.
        source: ImageSource,
        /// Destination rectangle.
        rect: Rect,
        /// Clip drawing to `rect`.
        clip: bool,
    },
}

/// Fixed-size card scene: canvas size plus back-to-front elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardScene {
    /// Canvas size in pixels at scale 1.
    pub size: SurfaceSize,
    /// Elements in paint order.
    pub elements: Vec<SceneElement>,
}

impl CardScene {
    /// All text runs in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Text run drawn at exactly `(x, baseline)`, if any.
    pub fn text_at(&self, x: f64, baseline: f64) -> Option<&TextRun> {
        self.texts().find(|t| t.x == x && t.baseline == baseline)
    }

    /// Image slots in paint order.
    pub fn images(&self) -> impl Iterator<Item = (ImageSource, Rect)> + '_ {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Image { source, rect, .. } => Some((*source, *rect)),
            _ => None,
        })
    }

    /// Serialize for inspection.
    pub fn to_json(&self) -> crate::foundation::error::CardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::foundation::error::CardError::serde(e.to_string()))
    }
}
