use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::assets::decode::{decode_image, parse_svg};
use crate::assets::svg_raster::rasterize_svg;
use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::RasterImage;

/// Fixed decorative images drawn on every card.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DecorativeAsset {
    /// National emblem, top center.
    CoatOfArms,
    /// Shield mark below the emblem.
    Shield,
    /// Fingerprint icon, bottom right.
    Fingerprint,
}

impl DecorativeAsset {
    /// Every asset, in slot order.
    pub const ALL: [Self; 3] = [Self::CoatOfArms, Self::Shield, Self::Fingerprint];

    /// Stable identifier, also the file stem looked up in an asset directory.
    pub fn id(self) -> &'static str {
        match self {
            Self::CoatOfArms => "coat_of_arms",
            Self::Shield => "shield",
            Self::Fingerprint => "fingerprint",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    fn bundled_svg(self) -> &'static [u8] {
        match self {
            Self::CoatOfArms => include_bytes!("../../assets/coat_of_arms.svg"),
            Self::Shield => include_bytes!("../../assets/shield.svg"),
            Self::Fingerprint => include_bytes!("../../assets/fingerprint.svg"),
        }
    }
}

/// A decoded decorative asset.
#[derive(Clone, Debug)]
pub enum PreparedAsset {
    /// Raster source, stretched into its slot at draw time.
    Raster(RasterImage),
    /// Vector source, rasterized at the slot's pixel size.
    Svg(Arc<usvg::Tree>),
}

impl PreparedAsset {
    /// Produce pixels for a `width`x`height` slot.
    pub fn raster_for(&self, width: u32, height: u32) -> CardResult<RasterImage> {
        match self {
            Self::Raster(img) => Ok(img.clone()),
            Self::Svg(tree) => rasterize_svg(tree, width, height),
        }
    }
}

/// Where an asset came from, reported for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetOrigin {
    /// Read from a file in the configured directory.
    File(PathBuf),
    /// Compiled-in default.
    Bundled,
}

/// Outcome of loading one asset slot.
#[derive(Clone, Debug)]
pub enum AssetSlot {
    /// Decoded and ready to draw.
    Ready {
        /// The decoded asset.
        asset: PreparedAsset,
        /// Where it came from.
        origin: AssetOrigin,
    },
    /// Loading failed; drawing this asset is skipped.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

/// The three decorative assets, each loaded or failed.
#[derive(Clone, Debug)]
pub struct AssetStore {
    slots: Vec<AssetSlot>,
}

impl AssetStore {
    /// Load every asset, preferring `<dir>/<id>.svg`, then `<dir>/<id>.png`, then the bundled
    /// default. All slots load in parallel and the call returns once every slot has resolved;
    /// a broken file fails only its own slot.
    #[tracing::instrument]
    pub fn load(dir: Option<&Path>) -> Self {
        let slots = DecorativeAsset::ALL
            .par_iter()
            .map(|&asset| match load_one(asset, dir) {
                Ok((asset, origin)) => AssetSlot::Ready { asset, origin },
                Err(e) => AssetSlot::Failed {
                    reason: e.to_string(),
                },
            })
            .collect::<Vec<_>>();

        for (asset, slot) in DecorativeAsset::ALL.iter().zip(&slots) {
            if let AssetSlot::Failed { reason } = slot {
                tracing::warn!(asset = asset.id(), %reason, "decorative asset failed to load");
            }
        }
        Self { slots }
    }

    /// Store built from the compiled-in defaults only.
    pub fn bundled() -> Self {
        Self::load(None)
    }

    /// Slot state for `asset`.
    pub fn slot(&self, asset: DecorativeAsset) -> &AssetSlot {
        &self.slots[asset.slot()]
    }

    /// Decoded asset, if its slot loaded.
    pub fn get(&self, asset: DecorativeAsset) -> Option<&PreparedAsset> {
        match self.slot(asset) {
            AssetSlot::Ready { asset, .. } => Some(asset),
            AssetSlot::Failed { .. } => None,
        }
    }

    /// Pixels for `asset` at `width`x`height`.
    pub fn raster(
        &self,
        asset: DecorativeAsset,
        width: u32,
        height: u32,
    ) -> CardResult<RasterImage> {
        match self.slot(asset) {
            AssetSlot::Ready { asset, .. } => asset.raster_for(width, height),
            AssetSlot::Failed { reason } => Err(CardError::asset(format!(
                "asset '{}' unavailable: {reason}",
                asset.id()
            ))),
        }
    }
}

fn load_one(
    asset: DecorativeAsset,
    dir: Option<&Path>,
) -> CardResult<(PreparedAsset, AssetOrigin)> {
    if let Some(dir) = dir {
        let svg = dir.join(format!("{}.svg", asset.id()));
        if svg.is_file() {
            let bytes = std::fs::read(&svg)
                .with_context(|| format!("read asset '{}'", svg.display()))?;
            return Ok((PreparedAsset::Svg(parse_svg(&bytes)?), AssetOrigin::File(svg)));
        }
        let png = dir.join(format!("{}.png", asset.id()));
        if png.is_file() {
            let bytes = std::fs::read(&png)
                .with_context(|| format!("read asset '{}'", png.display()))?;
            return Ok((
                PreparedAsset::Raster(decode_image(&bytes)?),
                AssetOrigin::File(png),
            ));
        }
    }
    Ok((
        PreparedAsset::Svg(parse_svg(asset.bundled_svg())?),
        AssetOrigin::Bundled,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
