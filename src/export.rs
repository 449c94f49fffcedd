//! PNG export of a composed card.

use crate::card::scene::CardScene;
use crate::foundation::error::CardResult;
use crate::render::cpu::CpuRenderer;
use crate::render::resources::{ResourceJoin, SceneResources};

/// Download filename of an exported card.
pub const EXPORT_FILENAME: &str = "kenya_id_card.png";

/// Encoded card ready to be offered as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedCard {
    /// Suggested filename.
    pub filename: &'static str,
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
}

/// Render `scene` at `scale` and encode it as PNG.
///
/// Every image the scene references is resolved before drawing starts. Images that fail to
/// resolve are left out instead of failing the export.
#[tracing::instrument(skip(renderer, scene, resources))]
pub fn export_card(
    renderer: &mut CpuRenderer,
    scene: &CardScene,
    resources: SceneResources<'_>,
    scale: u32,
) -> CardResult<ExportedCard> {
    let join = ResourceJoin::gather(scene, resources, scale);
    let frame = renderer.render(scene, &join, scale)?;
    let (width, height) = (frame.width, frame.height);
    let png = frame.into_raster()?.encode_png()?;
    tracing::info!(width, height, bytes = png.len(), "card exported");
    Ok(ExportedCard {
        filename: EXPORT_FILENAME,
        png,
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../tests/unit/export/png.rs"]
mod tests;
