//! Per-form state: one signature recorder, one crop selector, the accepted photo and the last
//! composed card.
//!
//! Each [`CardSession`] owns all of its state, so independent sessions never share anything
//! mutable.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::assets::store::AssetStore;
use crate::card::compose::compose;
use crate::card::record::CardRecord;
use crate::card::scene::CardScene;
use crate::config::StudioConfig;
use crate::crop::CropSelector;
use crate::export::{ExportedCard, export_card};
use crate::form::{DigitRng, FormInput, validate_submission};
use crate::foundation::core::Point;
use crate::foundation::error::{CardError, CardResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuRenderer;
use crate::render::resources::{ResourceJoin, SceneResources};
use crate::render::surface::RasterImage;
use crate::render::text::TextLayoutEngine;
use crate::signature::{InputEvent, InputOutcome, StrokeRecorder};

/// A validated record and the scene composed from it.
#[derive(Clone, Debug)]
pub struct ComposedCard {
    /// The record the scene was built from.
    pub record: CardRecord,
    /// The composed scene.
    pub scene: CardScene,
}

/// State of one card form.
#[derive(Debug)]
pub struct CardSession {
    config: StudioConfig,
    recorder: StrokeRecorder,
    crop: CropSelector,
    photo: Option<RasterImage>,
    assets: AssetStore,
    renderer: CpuRenderer,
    rng: DigitRng,
    card: Option<ComposedCard>,
}

impl CardSession {
    /// Build a session from `config`: surfaces, decorative assets and the card font.
    #[tracing::instrument(skip(config))]
    pub fn new(config: StudioConfig) -> CardResult<Self> {
        config.validate()?;
        let text = match &config.font {
            Some(path) => TextLayoutEngine::from_path(path)?,
            None => TextLayoutEngine::bundled()?,
        };
        let assets = AssetStore::load(config.assets_dir.as_deref());
        Ok(Self {
            recorder: StrokeRecorder::new(config.signature_size)?,
            crop: CropSelector::new(config.crop_size)?,
            photo: None,
            assets,
            renderer: CpuRenderer::new(Some(text)),
            rng: DigitRng::from_clock(),
            card: None,
            config,
        })
    }

    /// Use `rng` for ID and serial numbers.
    pub fn with_rng(mut self, rng: DigitRng) -> Self {
        self.rng = rng;
        self
    }

    /// Session configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Signature recorder.
    pub fn signature(&self) -> &StrokeRecorder {
        &self.recorder
    }

    /// Forward a pointer event to the signature recorder.
    pub fn signature_event(&mut self, event: InputEvent) -> CardResult<InputOutcome> {
        self.recorder.handle(event)
    }

    /// Blank the signature.
    pub fn clear_signature(&mut self) {
        self.recorder.clear();
    }

    /// Crop selector.
    pub fn crop(&self) -> &CropSelector {
        &self.crop
    }

    /// Decode an uploaded photo and show it for cropping. Any accepted photo is dropped.
    pub fn upload_photo(&mut self, bytes: &[u8]) -> CardResult<()> {
        self.crop.load_source_bytes(bytes)?;
        self.photo = None;
        Ok(())
    }

    /// Like [`Self::upload_photo`] for an already decoded image.
    pub fn upload_photo_image(&mut self, image: RasterImage) -> CardResult<()> {
        self.crop.load_source(image)?;
        self.photo = None;
        Ok(())
    }

    /// Start a crop drag.
    pub fn crop_start(&mut self, point: Point) {
        self.crop.start_selection(point);
    }

    /// Move the crop drag.
    pub fn crop_move(&mut self, point: Point) -> CardResult<()> {
        self.crop.update_selection(point)
    }

    /// Release the crop drag, extracting the pending crop if a rectangle was formed.
    pub fn crop_release(&mut self, point: Point) -> CardResult<Option<RasterImage>> {
        self.crop.confirm_selection(point)
    }

    /// Accept the pending crop as the card photo.
    pub fn accept_crop(&mut self) -> CardResult<&RasterImage> {
        let photo = self.crop.accept()?;
        Ok(self.photo.insert(photo))
    }

    /// Accepted photo, if any.
    pub fn photo(&self) -> Option<&RasterImage> {
        self.photo.as_ref()
    }

    /// Validate the form and compose a fresh card. Nothing changes on rejection.
    pub fn submit(&mut self, form: &FormInput, today: NaiveDate) -> CardResult<&ComposedCard> {
        let mut rng = self.rng;
        let record = validate_submission(
            form,
            self.photo.as_ref(),
            self.recorder.surface(),
            today,
            &mut rng,
        )?;
        let scene = compose(&record);
        self.rng = rng;
        Ok(self.card.insert(ComposedCard { record, scene }))
    }

    /// Last composed card.
    pub fn card(&self) -> Option<&ComposedCard> {
        self.card.as_ref()
    }

    /// Render the composed card at its nominal size.
    pub fn preview(&mut self) -> CardResult<FrameRGBA> {
        let card = self
            .card
            .as_ref()
            .ok_or_else(|| CardError::validation("no card has been composed"))?;
        let join = ResourceJoin::gather(&card.scene, resources(card, &self.assets), 1);
        self.renderer.render(&card.scene, &join, 1)
    }

    /// Export the composed card as PNG at the configured scale.
    pub fn download(&mut self) -> CardResult<ExportedCard> {
        let card = self
            .card
            .as_ref()
            .ok_or_else(|| CardError::validation("no card has been composed"))?;
        export_card(
            &mut self.renderer,
            &card.scene,
            resources(card, &self.assets),
            self.config.export_scale,
        )
    }

    /// Feed a recorded interaction into the session: photo upload, crop drag and acceptance,
    /// then signature input.
    #[tracing::instrument(skip(self, script))]
    pub fn replay(&mut self, script: &SessionScript, base_dir: &Path) -> CardResult<()> {
        if let Some(photo) = &script.photo {
            let path = base_dir.join(photo);
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read photo '{}'", path.display()))?;
            self.upload_photo(&bytes)?;
        }
        if let Some(drag) = &script.crop {
            self.crop_start(drag.from);
            for &p in &drag.through {
                self.crop_move(p)?;
            }
            self.crop_move(drag.to)?;
            self.crop_release(drag.to)?;
            self.accept_crop()?;
        }
        for &event in &script.signature {
            self.signature_event(event)?;
        }
        Ok(())
    }
}

fn resources<'a>(card: &'a ComposedCard, assets: &'a AssetStore) -> SceneResources<'a> {
    SceneResources {
        photo: Some(&card.record.photo),
        signature: Some(&card.record.signature),
        assets,
    }
}

/// A crop drag from `from` to `to`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropDrag {
    /// Press point.
    pub from: Point,
    /// Intermediate samples.
    #[serde(default)]
    pub through: Vec<Point>,
    /// Release point.
    pub to: Point,
}

/// Scripted session input, as read by the command line tool.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionScript {
    /// Form fields.
    pub form: FormInput,
    /// Photo file, relative to the script.
    pub photo: Option<PathBuf>,
    /// Crop gesture over the uploaded photo.
    pub crop: Option<CropDrag>,
    /// Signature pointer events.
    pub signature: Vec<InputEvent>,
}

impl SessionScript {
    /// Read a JSON script.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| CardError::serde(format!("session: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/session/card_session.rs"]
mod tests;
