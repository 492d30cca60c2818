use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{NormalizationMode, RAMP_STOPS};
use crate::error::{Error, Result};
use crate::material::Interpolation;

/// Global generator settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of stops in every resampled ramp
    pub target_count: usize,
    /// Reject control points whose positions decrease instead of resampling them as given
    pub strict_order: bool,
    pub default_colormap: String,
    /// Name given to generated materials
    pub material_name: String,
    /// Attribute the generated material reads its values from
    pub attribute_name: String,
    pub interpolation: Interpolation,
    pub normalization: NormalizationMode,
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            target_count: RAMP_STOPS,
            strict_order: false,
            default_colormap: "viridis".into(),
            material_name: "Shader_Generator".into(),
            attribute_name: "Col".into(),
            interpolation: Interpolation::Linear,
            normalization: NormalizationMode::Auto,
            preview_width: 256,
            preview_height: 32,
        }
    }
}

impl Settings {
    /// Read settings from JSON; absent keys keep their default.
    pub fn from_json(source: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(source).map_err(|e| Error::Format(e.to_string()))?;
        if settings.target_count < 2 {
            return Err(Error::InvalidTargetCount(settings.target_count));
        }
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&crate::resources::load_string(path.as_ref())?)
    }
}
