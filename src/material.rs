//! Boundary to the shading backend.
//!
//! The generator stops at a [`MaterialDescription`]: the ordered ramp stops,
//! the remap bounds and a few tags. Building an actual node graph or pipeline
//! out of it is the job of a [`ShadingBackend`].

use serde::{Deserialize, Serialize};

use crate::data::{
    ChannelLayout, ChannelRange, Color, NormalizationMode, Remap, ResampledRamp, RAMP_STOPS,
};
use crate::error::{Error, Result};

/// How the backend's ramp blends between stops.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    Constant,
    #[default]
    Linear,
    Ease,
    Cardinal,
    BSpline,
}

impl Interpolation {
    pub const ALL: [Interpolation; 5] = [
        Interpolation::Constant,
        Interpolation::Linear,
        Interpolation::Ease,
        Interpolation::Cardinal,
        Interpolation::BSpline,
    ];

    pub fn get_name(&self) -> &str {
        match self {
            Interpolation::Constant => "Constant",
            Interpolation::Linear => "Linear",
            Interpolation::Ease => "Ease",
            Interpolation::Cardinal => "Cardinal",
            Interpolation::BSpline => "B-Spline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColormapChoice {
    Named(String),
    /// The generator's custom ramp
    Custom,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialTarget {
    #[default]
    AllMeshes,
    Selected,
}

/// Everything needed to create one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequest {
    pub colormap: ColormapChoice,
    pub interpolation: Interpolation,
    pub material_name: String,
    /// Object whose attribute range drives the remap
    pub object: Option<String>,
    pub attribute: String,
    pub layout: ChannelLayout,
    pub mode: NormalizationMode,
    /// Bounds used verbatim with [`NormalizationMode::None`]
    pub fixed_range: ChannelRange,
    pub target: MaterialTarget,
}

impl MaterialRequest {
    pub fn named(colormap: impl Into<String>) -> Self {
        Self {
            colormap: ColormapChoice::Named(colormap.into()),
            ..Default::default()
        }
    }

    pub fn custom() -> Self {
        Self {
            colormap: ColormapChoice::Custom,
            ..Default::default()
        }
    }
}

impl Default for MaterialRequest {
    fn default() -> Self {
        Self {
            colormap: ColormapChoice::Named("viridis".into()),
            interpolation: Interpolation::Linear,
            material_name: "Shader_Generator".into(),
            object: None,
            attribute: "Col".into(),
            layout: ChannelLayout::Single,
            mode: NormalizationMode::Auto,
            fixed_range: ChannelRange::UNIT,
            target: MaterialTarget::AllMeshes,
        }
    }
}

/// What the backend receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialDescription {
    pub name: String,
    /// Name of the colormap, `"Custom"` for the custom ramp
    pub colormap: String,
    pub attribute: String,
    pub interpolation: Interpolation,
    pub layout: ChannelLayout,
    pub mode: NormalizationMode,
    pub ramp: ResampledRamp,
    pub remap: Remap,
    pub nan_color: Color,
    /// Meshes the material is meant for
    pub targets: Vec<String>,
}

impl MaterialDescription {
    /// Ramp stops with opaque alpha, in order.
    pub fn rgba_stops(&self) -> Vec<(f32, [f32; 4])> {
        self.ramp.to_rgba_stops()
    }
}

pub trait ShadingBackend {
    type Output;

    fn build(&mut self, material: &MaterialDescription) -> Result<Self::Output>;
}

/// Serializes descriptions, for hosts that build their graph from JSON.
#[derive(Debug, Default)]
pub struct JsonBackend {
    pub pretty: bool,
}

impl ShadingBackend for JsonBackend {
    type Output = String;

    fn build(&mut self, material: &MaterialDescription) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(material)?
        } else {
            serde_json::to_string(material)?
        };
        Ok(json)
    }
}

/// Uniform buffer layout of a ramp: up to 32 stops plus per-channel remap bounds.
///
/// Matches, with 16-byte array strides,
/// ```wgsl
/// struct Ramp {
///     colors: array<vec4<f32>, 32>,
///     positions: array<vec4<f32>, 8>,
///     from_min: vec4<f32>,
///     from_max: vec4<f32>,
///     stop_count: u32,
///     clamp: u32,
/// }
/// ```
/// Stop `i` sits at `positions[i / 4][i % 4]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RampUniform {
    pub colors: [[f32; 4]; RAMP_STOPS],
    pub positions: [[f32; 4]; RAMP_STOPS / 4],
    /// r, g, b, unused
    pub from_min: [f32; 4],
    pub from_max: [f32; 4],
    pub stop_count: u32,
    pub clamp: u32,
    _pad: [u32; 2],
}

impl TryFrom<&MaterialDescription> for RampUniform {
    type Error = Error;

    fn try_from(material: &MaterialDescription) -> Result<Self> {
        let stops = material.ramp.stops();
        if stops.is_empty() || stops.len() > RAMP_STOPS {
            return Err(Error::InvalidTargetCount(stops.len()));
        }
        let mut uniform = RampUniform {
            colors: [[0.; 4]; RAMP_STOPS],
            positions: [[1.; 4]; RAMP_STOPS / 4],
            from_min: [0.; 4],
            from_max: [1.; 4],
            stop_count: stops.len() as u32,
            clamp: 0,
            _pad: [0; 2],
        };
        let last = stops[stops.len() - 1].color.to_rgba();
        for i in 0..RAMP_STOPS {
            uniform.colors[i] = stops.get(i).map(|s| s.color.to_rgba()).unwrap_or(last);
            if let Some(stop) = stops.get(i) {
                uniform.positions[i / 4][i % 4] = stop.position;
            }
        }
        for c in 0..3 {
            let bounds = material.remap.channel(c);
            uniform.from_min[c] = bounds.from.min;
            uniform.from_max[c] = bounds.from.max;
            uniform.clamp |= (bounds.clamp as u32) << c;
        }
        Ok(uniform)
    }
}

impl RampUniform {
    pub fn position(&self, i: usize) -> f32 {
        self.positions[i / 4][i % 4]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{resample, ColorStop, RangeOutput};

    fn description(stops: usize) -> MaterialDescription {
        let ramp = resample(
            &[ColorStop::new(0., Color::RED), ColorStop::new(1., Color::BLUE)],
            stops,
        )
        .unwrap();
        MaterialDescription {
            name: "m".into(),
            colormap: "test".into(),
            attribute: "Col".into(),
            interpolation: Interpolation::Linear,
            layout: ChannelLayout::Single,
            mode: NormalizationMode::Auto,
            ramp,
            remap: RangeOutput::Single(ChannelRange::new(2., 4.)).into(),
            nan_color: Color::WHITE,
            targets: Vec::new(),
        }
    }

    #[test]
    fn uniform_arrays_have_vec4_stride() {
        assert_eq!(std::mem::size_of::<RampUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<[[f32; 4]; RAMP_STOPS / 4]>(), RAMP_STOPS * 4);
        let uniform = RampUniform::try_from(&description(RAMP_STOPS)).unwrap();
        let offset = std::mem::size_of::<[[f32; 4]; RAMP_STOPS]>();
        let bytes = uniform.as_bytes();
        let last = &bytes[offset + (RAMP_STOPS - 1) * 4..offset + RAMP_STOPS * 4];
        assert_eq!(last, &1f32.to_ne_bytes()[..]);
        assert_eq!(uniform.position(0), 0.);
        assert_eq!(uniform.position(RAMP_STOPS - 1), 1.);
        assert_eq!(uniform.from_min, [2., 2., 2., 0.]);
    }

    #[test]
    fn short_ramps_pad_with_last_stop() {
        let uniform = RampUniform::try_from(&description(4)).unwrap();
        assert_eq!(uniform.stop_count, 4);
        assert_eq!(uniform.position(3), 1.);
        assert_eq!(uniform.position(10), 1.);
        assert_eq!(uniform.colors[20], [0., 0., 1., 1.]);
    }
}
