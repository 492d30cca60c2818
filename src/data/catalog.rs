//! Named colormap registry.
//! - Parses ParaView style `RGBPoints` descriptions
//! - Rescales every definition onto [0, 1]
//! - Ships the stock scientific maps as an embedded description file

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Color, ColorStop};
use crate::error::{Error, Result};

/// Stock colormaps, evenly spaced.
const BUILTIN: &str = include_str!("assets/colormaps.json");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColormapDefinition {
    name: String,
    stops: Vec<ColorStop>,
    nan_color: Color,
    color_space: String,
}

impl ColormapDefinition {
    /// Build a definition from a flat `position, r, g, b` sequence.
    ///
    /// Positions are rescaled so the first lands on 0 and the last on 1, then
    /// stops are sorted by position.
    pub fn from_points(name: impl Into<String>, points: &[f32]) -> Result<Self> {
        let name = name.into();
        if points.len() % 4 != 0 {
            return Err(Error::Format(format!(
                "'{}': RGBPoints holds {} numbers, expected a multiple of 4",
                name,
                points.len()
            )));
        }
        if points.is_empty() {
            return Err(Error::Format(format!("'{}': no control points", name)));
        }
        if let Some(i) = points.iter().position(|v| !v.is_finite()) {
            return Err(Error::Format(format!(
                "'{}': RGBPoints entry {} is not a finite number",
                name, i
            )));
        }
        let mut stops: Vec<ColorStop> = points
            .chunks_exact(4)
            .map(|p| ColorStop::new(p[0], Color::new(p[1], p[2], p[3])))
            .collect();

        let (min, max) = stops
            .iter()
            .fold((f32::MAX, f32::MIN), |(min, max), stop| {
                (min.min(stop.position), max.max(stop.position))
            });
        if min != 0. || max != 1. {
            if max == min {
                return Err(Error::DegenerateRange {
                    name,
                    position: min,
                });
            }
            // f64 so spans wider than f32::MAX stay finite
            let (min, span) = (min as f64, max as f64 - min as f64);
            for stop in &mut stops {
                stop.position = ((stop.position as f64 - min) / span) as f32;
            }
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));

        Ok(Self {
            name,
            stops,
            nan_color: Color::WHITE,
            color_space: "RGB".into(),
        })
    }

    /// Colors spread evenly over [0, 1].
    pub fn evenly_spaced(name: impl Into<String>, colors: &[Color]) -> Result<Self> {
        let n = colors.len();
        let points: Vec<f32> = colors
            .iter()
            .enumerate()
            .flat_map(|(i, c)| {
                let position = if n > 1 { i as f32 / (n - 1) as f32 } else { 0. };
                [position, c.r, c.g, c.b]
            })
            .collect();
        Self::from_points(name, &points)
    }

    pub fn with_nan_color(mut self, nan_color: Color) -> Self {
        self.nan_color = nan_color;
        self
    }

    pub fn with_color_space(mut self, color_space: impl Into<String>) -> Self {
        self.color_space = color_space.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn nan_color(&self) -> Color {
        self.nan_color
    }

    pub fn color_space(&self) -> &str {
        &self.color_space
    }
}

#[derive(Deserialize)]
struct RawColormap {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "RGBPoints")]
    rgb_points: Option<Vec<f32>>,
    #[serde(rename = "NanColor")]
    nan_color: Option<Vec<f32>>,
    #[serde(rename = "ColorSpace")]
    color_space: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Many(Vec<RawColormap>),
    One(RawColormap),
}

impl TryFrom<RawColormap> for ColormapDefinition {
    type Error = Error;

    fn try_from(raw: RawColormap) -> Result<Self> {
        let name = raw
            .name
            .ok_or_else(|| Error::Format("colormap without a Name".into()))?;
        let points = raw
            .rgb_points
            .ok_or_else(|| Error::Format(format!("'{}': missing RGBPoints", name)))?;
        let nan_color = match raw.nan_color {
            None => Color::WHITE,
            Some(c) if c.len() == 3 => Color::new(c[0], c[1], c[2]),
            Some(c) => {
                return Err(Error::Format(format!(
                    "'{}': NanColor holds {} numbers, expected 3",
                    name,
                    c.len()
                )))
            }
        };
        let definition = ColormapDefinition::from_points(name, &points)?
            .with_nan_color(nan_color)
            .with_color_space(raw.color_space.unwrap_or_else(|| "RGB".into()));
        Ok(definition)
    }
}

/// Parse a colormap description: a single record or an array of records.
///
/// Either every record is valid or nothing is returned.
pub fn load(source: &str) -> Result<Vec<ColormapDefinition>> {
    let raw: RawSource =
        serde_json::from_str(source).map_err(|e| Error::Format(e.to_string()))?;
    let records = match raw {
        RawSource::Many(records) => records,
        RawSource::One(record) => vec![record],
    };
    records.into_iter().map(ColormapDefinition::try_from).collect()
}

/// Colormaps by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ColormapCatalog {
    colormaps: IndexMap<String, ColormapDefinition>,
}

impl ColormapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the stock scientific colormaps.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        match load(BUILTIN) {
            Ok(definitions) => {
                catalog.merge(definitions);
            }
            Err(e) => log::error!("Embedded colormaps are invalid: {}", e),
        }
        catalog
    }

    /// Insert or replace definitions by name. Returns how many were merged.
    pub fn merge(&mut self, definitions: impl IntoIterator<Item = ColormapDefinition>) -> usize {
        let mut count = 0;
        for definition in definitions {
            if self
                .colormaps
                .insert(definition.name.clone(), definition)
                .is_some()
            {
                log::debug!("Replaced an existing colormap");
            }
            count += 1;
        }
        count
    }

    /// Parse the whole file first, the catalog only changes when it is valid.
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let text = crate::resources::load_string(path.as_ref())?;
        let definitions = load(&text)?;
        let count = self.merge(definitions);
        log::info!(
            "Imported {} colormaps from {}",
            count,
            path.as_ref().display()
        );
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Result<&ColormapDefinition> {
        self.colormaps
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.colormaps.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.colormaps.keys().map(|name| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColormapDefinition> + '_ {
        self.colormaps.values()
    }

    pub fn len(&self) -> usize {
        self.colormaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colormaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescales_positions() {
        let defs = load(
            r#"[{"Name": "shifted", "RGBPoints": [-2, 0, 0, 0, 0, 0.5, 0.5, 0.5, 2, 1, 1, 1]}]"#,
        )
        .unwrap();
        let positions: Vec<f32> = defs[0].stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0., 0.5, 1.]);
        assert_eq!(defs[0].nan_color(), Color::WHITE);
        assert_eq!(defs[0].color_space(), "RGB");
    }

    #[test]
    fn unit_span_untouched_and_sorted() {
        let def = ColormapDefinition::from_points("x", &[1., 1., 1., 1., 0., 0., 0., 0., 0.3, 0.2, 0.2, 0.2])
            .unwrap();
        let positions: Vec<f32> = def.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0., 0.3, 1.]);
    }

    #[test]
    fn format_errors() {
        let eleven = r#"{"Name": "bad", "RGBPoints": [0, 0, 0, 0, 0.5, 1, 1, 1, 1, 0, 0]}"#;
        assert!(matches!(load(eleven), Err(Error::Format(_))));
        assert!(matches!(
            load(r#"{"RGBPoints": [0, 0, 0, 0, 1, 1, 1, 1]}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            load(r#"{"Name": "empty", "RGBPoints": []}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            load(r#"{"Name": "nan", "RGBPoints": [0, 0, 0, 0, 1, 1, 1, 1], "NanColor": [1, 0]}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(load("not json"), Err(Error::Format(_))));
    }

    #[test]
    fn degenerate_span() {
        let single = r#"{"Name": "dot", "RGBPoints": [0.4, 1, 0, 0]}"#;
        assert!(matches!(
            load(single),
            Err(Error::DegenerateRange { position, .. }) if position == 0.4
        ));
        let stacked = r#"{"Name": "stack", "RGBPoints": [0.4, 1, 0, 0, 0.4, 0, 1, 0]}"#;
        assert!(matches!(load(stacked), Err(Error::DegenerateRange { .. })));
    }

    #[test]
    fn wide_spans_stay_in_unit_range() {
        let defs = load(
            r#"{"Name": "wide", "RGBPoints": [-3e38, 0, 0, 0, 0, 0.5, 0.5, 0.5, 3e38, 1, 1, 1]}"#,
        )
        .unwrap();
        let positions: Vec<f32> = defs[0].stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0., 0.5, 1.]);

        let def = ColormapDefinition::from_points("edge", &[f32::MIN, 0., 0., 0., f32::MAX, 1., 1., 1.])
            .unwrap();
        assert_eq!(def.stops()[0].position, 0.);
        assert_eq!(def.stops()[1].position, 1.);
    }

    #[test]
    fn non_finite_points_rejected() {
        assert!(matches!(
            load(r#"{"Name": "huge", "RGBPoints": [0, 0, 0, 0, 1e39, 1, 1, 1]}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            ColormapDefinition::from_points("nan", &[0., f32::NAN, 0., 0., 1., 1., 1., 1.]),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            ColormapDefinition::from_points("inf", &[0., 0., 0., 0., f32::INFINITY, 1., 1., 1.]),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn optional_fields() {
        let defs = load(
            r#"{"Name": "cw", "Creator": "x", "ColorSpace": "Diverging", "NanColor": [1, 1, 0],
                "RGBPoints": [0, 0, 0, 1, 1, 1, 0, 0]}"#,
        )
        .unwrap();
        assert_eq!(defs[0].color_space(), "Diverging");
        assert_eq!(defs[0].nan_color(), Color::new(1., 1., 0.));
    }

    #[test]
    fn merge_overwrites_in_place() {
        let mut catalog = ColormapCatalog::builtin();
        let before = catalog.names().iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let replacement = ColormapDefinition::evenly_spaced("plasma", &[Color::BLACK, Color::WHITE]).unwrap();
        let extra = ColormapDefinition::evenly_spaced("grey", &[Color::BLACK, Color::WHITE]).unwrap();
        assert_eq!(catalog.merge([replacement, extra]), 2);
        assert_eq!(catalog.len(), before.len() + 1);
        assert_eq!(catalog.names()[1], "plasma");
        assert_eq!(catalog.names().last(), Some(&"grey"));
        assert_eq!(catalog.get("plasma").unwrap().stops().len(), 2);
    }

    #[test]
    fn builtin_maps() {
        let catalog = ColormapCatalog::builtin();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.names()[0], "viridis");
        for definition in catalog.iter() {
            let stops = definition.stops();
            assert_eq!(stops[0].position, 0.);
            assert_eq!(stops[stops.len() - 1].position, 1.);
        }
        let viridis = catalog.get("viridis").unwrap();
        assert_eq!(viridis.stops().len(), 10);
        assert!(viridis.stops()[0].color.max_abs_diff(&Color::from_rgb8(68, 1, 84)) < 1e-5);
        assert!(matches!(catalog.get("nope"), Err(Error::NotFound(_))));
    }
}
