use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Color, ColorStop};
use crate::error::{Error, Result};

/// A ramp authored by hand, outside the catalog.
///
/// Holds at least two stops. Positions stay within [0, 1] but are kept in
/// authoring order; [`CustomRamp::sorted_stops`] gives the resampler view.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRamp {
    stops: Vec<ColorStop>,
}

/// One entry of the persisted ramp. Alpha is written as 1 and dropped on load.
#[derive(Serialize, Deserialize)]
struct StoredStop {
    color: Vec<f32>,
    position: f32,
}

impl CustomRamp {
    pub fn new() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0., Color::BLACK),
                ColorStop::new(1., Color::WHITE),
            ],
        }
    }

    pub fn from_stops(stops: Vec<ColorStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::Format(format!(
                "a custom ramp needs at least 2 stops, got {}",
                stops.len()
            )));
        }
        let stops = stops
            .into_iter()
            .map(|s| ColorStop::new(s.position.clamp(0., 1.), s.color))
            .collect();
        Ok(Self { stops })
    }

    /// Append a white stop at `n / (n + 1)`, `n` counting the new stop.
    pub fn add_color(&mut self) -> usize {
        let n = self.stops.len() + 1;
        self.stops
            .push(ColorStop::new(n as f32 / (n + 1) as f32, Color::WHITE));
        self.stops.len() - 1
    }

    /// Drop the last stop. Refuses to go below two stops.
    pub fn remove_color(&mut self) -> bool {
        if self.stops.len() > 2 {
            self.stops.pop();
            true
        } else {
            false
        }
    }

    pub fn set_color(&mut self, index: usize, color: Color) -> Result<()> {
        let stop = self.stop_mut(index)?;
        stop.color = color;
        Ok(())
    }

    pub fn set_position(&mut self, index: usize, position: f32) -> Result<()> {
        let stop = self.stop_mut(index)?;
        stop.position = position.clamp(0., 1.);
        Ok(())
    }

    fn stop_mut(&mut self, index: usize) -> Result<&mut ColorStop> {
        let len = self.stops.len();
        self.stops.get_mut(index).ok_or_else(|| {
            Error::NotFound(format!("custom ramp stop {} (ramp holds {})", index, len))
        })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops ordered by position, ties kept in authoring order.
    pub fn sorted_stops(&self) -> Vec<ColorStop> {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        stops
    }

    pub fn to_json(&self) -> Result<String> {
        let stored: Vec<StoredStop> = self
            .stops
            .iter()
            .map(|s| StoredStop {
                color: s.color.to_rgba().to_vec(),
                position: s.position,
            })
            .collect();
        Ok(serde_json::to_string(&stored)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let stored: Vec<StoredStop> =
            serde_json::from_str(source).map_err(|e| Error::Format(e.to_string()))?;
        let stops = stored
            .into_iter()
            .enumerate()
            .map(|(i, s)| match s.color.as_slice() {
                [r, g, b] | [r, g, b, _] => Ok(ColorStop::new(s.position, Color::new(*r, *g, *b))),
                other => Err(Error::Format(format!(
                    "stop {}: color holds {} numbers, expected 3 or 4",
                    i,
                    other.len()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_stops(stops)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::resources::save_string(path.as_ref(), &self.to_json()?)?;
        log::info!("ColorRamp saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let ramp = Self::from_json(&crate::resources::load_string(path.as_ref())?)?;
        log::info!("ColorRamp loaded from {}", path.as_ref().display());
        Ok(ramp)
    }
}

impl Default for CustomRamp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut ramp = CustomRamp::new();
        assert_eq!(ramp.add_color(), 2);
        assert_eq!(ramp.stops()[2].position, 0.75);
        assert_eq!(ramp.stops()[2].color, Color::WHITE);
        ramp.add_color();
        assert_eq!(ramp.stops()[3].position, 0.8);

        assert!(ramp.remove_color());
        assert!(ramp.remove_color());
        assert!(!ramp.remove_color());
        assert_eq!(ramp.len(), 2);
    }

    #[test]
    fn positions_clamped() {
        let mut ramp = CustomRamp::new();
        ramp.set_position(0, -3.).unwrap();
        ramp.set_position(1, 1.5).unwrap();
        assert_eq!(ramp.stops()[0].position, 0.);
        assert_eq!(ramp.stops()[1].position, 1.);
        assert!(matches!(ramp.set_color(7, Color::RED), Err(Error::NotFound(_))));
    }

    #[test]
    fn sorting_is_a_view() {
        let mut ramp = CustomRamp::new();
        ramp.set_position(0, 0.9).unwrap();
        ramp.set_position(1, 0.1).unwrap();
        let sorted = ramp.sorted_stops();
        assert_eq!(sorted[0].color, Color::WHITE);
        assert_eq!(ramp.stops()[0].color, Color::BLACK);
    }

    #[test]
    fn json_drops_alpha() {
        let ramp = CustomRamp::from_json(
            r#"[{"color": [1, 0, 0, 0.25], "position": 0.2}, {"color": [0, 0, 1], "position": 0.9}]"#,
        )
        .unwrap();
        assert_eq!(ramp.stops()[0], ColorStop::new(0.2, Color::RED));
        assert_eq!(ramp.stops()[1], ColorStop::new(0.9, Color::BLUE));

        let json = ramp.to_json().unwrap();
        assert!(json.contains("[1.0,0.0,0.0,1.0]"));
        assert_eq!(CustomRamp::from_json(&json).unwrap(), ramp);
    }

    #[test]
    fn json_rejects_short_ramps() {
        assert!(matches!(
            CustomRamp::from_json(r#"[{"color": [1, 0, 0], "position": 0.2}]"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            CustomRamp::from_json(r#"[{"color": [1, 0], "position": 0.2}, {"color": [1, 0, 0], "position": 1}]"#),
            Err(Error::Format(_))
        ));
    }
}
