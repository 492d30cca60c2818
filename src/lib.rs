#![doc = include_str!("../README.md")]
use std::path::Path;

pub mod data;
mod error;
/// Boundary types handed to shading backends.
pub mod material;
pub mod preview;
pub mod resources;
/// Scene attribute access.
pub mod scene;
mod settings;
/// General types for genericity in functions parameters.
pub mod types;

use data::{
    range_for_attribute, resample, resample_strict, ColorStop, ColormapCatalog, ColormapDefinition,
    CustomRamp, RangeOutput, ResampledRamp,
};
pub use error::{Error, Result};
use material::{ColormapChoice, MaterialDescription, MaterialRequest, MaterialTarget};
use scene::{AttributeSource, Scene};
pub use settings::Settings;

/// Outcome of a user-triggered operation, worded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Info(String),
    Error(String),
}

impl Report {
    pub fn message(&self) -> &str {
        match self {
            Report::Info(m) | Report::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error(_))
    }
}

/// Holds the colormap catalog and the custom ramp. Starting point to create materials.
pub struct ShaderGenerator {
    settings: Settings,
    catalog: ColormapCatalog,
    custom_ramp: CustomRamp,
}

impl ShaderGenerator {
    /// Generator with the stock colormaps.
    pub fn new(settings: Settings) -> Self {
        Self::with_catalog(settings, ColormapCatalog::builtin())
    }

    pub fn with_catalog(settings: Settings, catalog: ColormapCatalog) -> Self {
        Self {
            settings,
            catalog,
            custom_ramp: CustomRamp::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &ColormapCatalog {
        &self.catalog
    }

    /// Choices a selection layer should offer: every colormap, then `"Custom"`.
    pub fn colormap_names(&self) -> Vec<&str> {
        let mut names = self.catalog.names();
        names.push("Custom");
        names
    }

    pub fn merge_colormaps(
        &mut self,
        definitions: impl IntoIterator<Item = ColormapDefinition>,
    ) -> usize {
        let count = self.catalog.merge(definitions);
        log::info!("Merged {} colormaps, catalog holds {}", count, self.catalog.len());
        count
    }

    /// Import a description file. On failure the catalog is left as it was.
    pub fn import_colormaps(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.catalog.import(path)
    }

    /// [`Self::import_colormaps`] with the error turned into a report.
    pub fn import_colormaps_reported(&mut self, path: impl AsRef<Path>) -> Report {
        let path = path.as_ref();
        match self.import_colormaps(path) {
            Ok(count) => Report::Info(format!(
                "Imported {} colormaps from {}",
                count,
                path.display()
            )),
            Err(e) => {
                log::warn!("Colormap import failed: {}", e);
                Report::Error(format!("Could not import {}: {}", path.display(), e))
            }
        }
    }

    pub fn custom_ramp(&self) -> &CustomRamp {
        &self.custom_ramp
    }

    pub fn custom_ramp_mut(&mut self) -> &mut CustomRamp {
        &mut self.custom_ramp
    }

    pub fn save_custom_ramp(&self, path: impl AsRef<Path>) -> Report {
        let path = path.as_ref();
        match self.custom_ramp.save(path) {
            Ok(()) => Report::Info(format!("ColorRamp saved to {}", path.display())),
            Err(e) => Report::Error(e.to_string()),
        }
    }

    /// Replace the custom ramp with the file's content, unchanged on failure.
    pub fn load_custom_ramp(&mut self, path: impl AsRef<Path>) -> Report {
        let path = path.as_ref();
        match CustomRamp::load(path) {
            Ok(ramp) => {
                self.custom_ramp = ramp;
                Report::Info(format!("ColorRamp loaded from {}", path.display()))
            }
            Err(e) => {
                log::warn!("Custom ramp load failed: {}", e);
                Report::Error(e.to_string())
            }
        }
    }

    /// Resample stops to the configured ramp size.
    pub fn resample(&self, stops: &[ColorStop]) -> Result<ResampledRamp> {
        if self.settings.strict_order {
            resample_strict(stops, self.settings.target_count)
        } else {
            resample(stops, self.settings.target_count)
        }
    }

    pub fn ramp_for(&self, choice: &ColormapChoice) -> Result<ResampledRamp> {
        match choice {
            ColormapChoice::Named(name) => self.resample(self.catalog.get(name)?.stops()),
            ColormapChoice::Custom => self.resample(&self.custom_ramp.sorted_stops()),
        }
    }

    /// Resolve the colormap, resample it and measure the attribute range.
    ///
    /// A missing object or attribute does not fail: the remap then spans (0, 1).
    pub fn create_material<S: AttributeSource + ?Sized>(
        &self,
        request: &MaterialRequest,
        scene: &S,
    ) -> Result<MaterialDescription> {
        let (colormap, nan_color) = match &request.colormap {
            ColormapChoice::Named(name) => {
                let definition = self.catalog.get(name)?;
                (definition.name().to_owned(), definition.nan_color())
            }
            ColormapChoice::Custom => ("Custom".to_owned(), data::Color::WHITE),
        };
        let ramp = self.ramp_for(&request.colormap)?;

        let range = match &request.object {
            Some(object) => range_for_attribute(
                scene,
                object,
                &request.attribute,
                request.layout,
                request.mode,
                request.fixed_range,
            ),
            None => data::compute_range(None, request.mode, request.fixed_range),
        };
        let range = match (request.layout, range) {
            (data::ChannelLayout::PerChannel, RangeOutput::Single(r)) => {
                RangeOutput::PerChannel([r; 3])
            }
            (_, range) => range,
        };

        log::info!(
            "Created material '{}' from {} with {} interpolation",
            request.material_name,
            colormap,
            request.interpolation.get_name()
        );
        Ok(MaterialDescription {
            name: request.material_name.clone(),
            colormap,
            attribute: request.attribute.clone(),
            interpolation: request.interpolation,
            layout: request.layout,
            mode: request.mode,
            ramp,
            remap: range.into(),
            nan_color,
            targets: Vec::new(),
        })
    }

    /// [`Self::create_material`] on an in-memory scene, listing the meshes the
    /// request targets.
    pub fn create_scene_material(
        &self,
        request: &MaterialRequest,
        scene: &Scene,
    ) -> Result<MaterialDescription> {
        let mut material = self.create_material(request, scene)?;
        material.targets = scene
            .meshes(request.target == MaterialTarget::Selected)
            .into_iter()
            .map(String::from)
            .collect();
        Ok(material)
    }

    /// Request prefilled from the settings.
    pub fn default_request(&self) -> MaterialRequest {
        MaterialRequest {
            colormap: ColormapChoice::Named(self.settings.default_colormap.clone()),
            interpolation: self.settings.interpolation,
            material_name: self.settings.material_name.clone(),
            attribute: self.settings.attribute_name.clone(),
            mode: self.settings.normalization,
            ..Default::default()
        }
    }
}

impl Default for ShaderGenerator {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
