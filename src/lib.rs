//! Cardsmith draws mock identity-card images on the CPU.
//!
//! A session combines three pieces:
//!
//! - a freehand [`StrokeRecorder`] capturing the holder's signature
//! - a [`CropSelector`] extracting the photo from an uploaded image
//! - the card compositor, which turns a validated [`CardRecord`] into a retained [`CardScene`]
//!
//! The scene is the single visual description of the card. Previews and PNG exports are both
//! rendered from it by [`CpuRenderer`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Decorative asset loading and decoding.
pub mod assets;
/// Card record, scene model and fixed-layout composition.
pub mod card;
/// Session configuration.
pub mod config;
/// Photo crop selection.
pub mod crop;
/// PNG export.
pub mod export;
/// Form validation and number generation.
pub mod form;
/// Pixel surfaces and scene rendering.
pub mod render;
/// Per-form session state.
pub mod session;
/// Freehand signature capture.
pub mod signature;

pub use crate::foundation::core::{Affine, PixelRect, Point, Rect, Rgba8, SurfaceSize, Vec2};
pub use crate::foundation::error::{CardError, CardResult, Rejection};

pub use crate::assets::store::{AssetStore, DecorativeAsset};
pub use crate::card::compose::compose;
pub use crate::card::record::CardRecord;
pub use crate::card::scene::CardScene;
pub use crate::config::StudioConfig;
pub use crate::crop::{CropPhase, CropSelector};
pub use crate::export::{EXPORT_FILENAME, ExportedCard, export_card};
pub use crate::form::{DigitRng, FormInput, validate_submission};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::resources::{ResourceJoin, SceneResources};
pub use crate::render::surface::{RasterImage, Surface};
pub use crate::render::text::TextLayoutEngine;
pub use crate::session::{CardSession, ComposedCard, SessionScript};
pub use crate::signature::{InputEvent, InputOutcome, PointerSample, StrokeRecorder};
