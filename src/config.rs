use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{CardError, CardResult};
use crate::render::cpu::MAX_SCALE;

/// Environment variable overriding [`StudioConfig::assets_dir`].
pub const ENV_ASSETS_DIR: &str = "CARDSMITH_ASSETS_DIR";
/// Environment variable overriding [`StudioConfig::font`].
pub const ENV_FONT: &str = "CARDSMITH_FONT";

/// Settings for one card session.
///
/// Loaded from JSON; every field is optional and falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    /// Signature surface size.
    #[serde(default = "default_signature_size")]
    pub signature_size: SurfaceSize,
    /// Crop surface size.
    #[serde(default = "default_crop_size")]
    pub crop_size: SurfaceSize,
    /// Directory holding decorative asset overrides.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    /// TTF/OTF font used for card text. The bundled DejaVu Sans faces are used when unset.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Integer scale applied on export.
    #[serde(default = "default_export_scale")]
    pub export_scale: u32,
}

fn default_signature_size() -> SurfaceSize {
    SurfaceSize::new(300, 100)
}

fn default_crop_size() -> SurfaceSize {
    SurfaceSize::new(320, 320)
}

fn default_export_scale() -> u32 {
    2
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            signature_size: default_signature_size(),
            crop_size: default_crop_size(),
            assets_dir: None,
            font: None,
            export_scale: default_export_scale(),
        }
    }
}

impl StudioConfig {
    /// Parse a JSON config.
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s).map_err(|e| CardError::serde(format!("config: {e}")))
    }

    /// Read and parse a JSON config file. Relative asset and font paths resolve against the
    /// file's directory.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            cfg.assets_dir = cfg.assets_dir.map(|p| base.join(p));
            cfg.font = cfg.font.map(|p| base.join(p));
        }
        Ok(cfg)
    }

    /// Apply `CARDSMITH_ASSETS_DIR` and `CARDSMITH_FONT` from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Apply overrides from `lookup`, keyed by environment variable name. Empty values are
    /// ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = lookup(ENV_ASSETS_DIR) {
            tracing::debug!(dir = %dir.display(), "asset dir from environment");
            self.assets_dir = Some(dir);
        }
        if let Some(font) = lookup(ENV_FONT) {
            tracing::debug!(font = %font.display(), "font from environment");
            self.font = Some(font);
        }
        self
    }

    /// Check sizes and scale.
    pub fn validate(&self) -> CardResult<()> {
        self.signature_size
            .validate()
            .map_err(|e| CardError::validation(format!("signature_size: {e}")))?;
        self.crop_size
            .validate()
            .map_err(|e| CardError::validation(format!("crop_size: {e}")))?;
        if !(1..=MAX_SCALE).contains(&self.export_scale) {
            return Err(CardError::validation(format!(
                "export_scale must be in 1..={MAX_SCALE}, got {}",
                self.export_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/studio.rs"]
mod tests;
