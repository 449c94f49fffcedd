//! Resolution of every image a scene references, as one join.
//!
//! Rendering never starts while an image is still pending: [`ResourceJoin::gather`] resolves the
//! complete, known-size set of image slots in parallel and only returns once each slot has
//! settled as ready or failed. A failed slot is drawn as nothing, so one broken image cannot
//! block the card.

use rayon::prelude::*;

use crate::assets::store::AssetStore;
use crate::card::scene::{CardScene, ImageSource, SceneElement};
use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::RasterImage;

/// Inputs the scene's image slots are filled from.
#[derive(Clone, Copy, Debug)]
pub struct SceneResources<'a> {
    /// Accepted cropped photo.
    pub photo: Option<&'a RasterImage>,
    /// Signature snapshot.
    pub signature: Option<&'a RasterImage>,
    /// Decorative assets.
    pub assets: &'a AssetStore,
}

/// Settled state of one image slot.
#[derive(Clone, Debug)]
pub enum SlotState {
    /// Pixels ready to draw.
    Ready(RasterImage),
    /// Could not be produced; the slot is skipped.
    Failed(String),
}

/// Settled image slots, indexed like `CardScene::elements`.
#[derive(Clone, Debug)]
pub struct ResourceJoin {
    slots: Vec<Option<SlotState>>,
}

impl ResourceJoin {
    /// Resolve every image slot of `scene` for rendering at `scale`.
    #[tracing::instrument(skip(scene, resources))]
    pub fn gather(scene: &CardScene, resources: SceneResources<'_>, scale: u32) -> Self {
        let slots = scene
            .elements
            .par_iter()
            .map(|element| match element {
                SceneElement::Image { source, rect, .. } => {
                    let w = (rect.width() * f64::from(scale)).round().max(1.0) as u32;
                    let h = (rect.height() * f64::from(scale)).round().max(1.0) as u32;
                    Some(match resolve(*source, resources, w, h) {
                        Ok(img) => SlotState::Ready(img),
                        Err(e) => SlotState::Failed(e.to_string()),
                    })
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        for (i, slot) in slots.iter().enumerate() {
            if let Some(SlotState::Failed(reason)) = slot {
                tracing::warn!(element = i, %reason, "image slot failed; drawing skipped");
            }
        }
        Self { slots }
    }

    /// Settled state for the element at `index` (`None` for non-image elements).
    pub fn slot(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// Number of image slots in the join.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// `true` when the scene references no images.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots that failed.
    pub fn failed(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|s| matches!(s, SlotState::Failed(_)))
            .count()
    }
}

fn resolve(
    source: ImageSource,
    resources: SceneResources<'_>,
    width: u32,
    height: u32,
) -> CardResult<RasterImage> {
    match source {
        ImageSource::Photo => resources
            .photo
            .cloned()
            .ok_or_else(|| CardError::asset("no photo supplied")),
        ImageSource::Signature => resources
            .signature
            .cloned()
            .ok_or_else(|| CardError::asset("no signature supplied")),
        ImageSource::Asset(asset) => resources.assets.raster(asset, width, height),
    }
}
