//! Fixed-resolution resampling of piecewise-linear color ramps.
//!
//! Shading backends only accept a fixed number of ramp stops, so every
//! colormap is funneled through [`resample`] before it leaves the crate.

use serde::{Deserialize, Serialize};

use super::Color;
use crate::error::{Error, Result};

/// Number of stops a shading ramp holds.
pub const RAMP_STOPS: usize = 32;

/// A (position, color) pair anchoring the ramp.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Output of [`resample`]: `target_count` stops on the even grid `i / (n - 1)`.
///
/// Colors are not clamped. Interpolating authored colors never leaves their
/// convex hull, but callers that need the [0, 1] contract must use
/// [`ResampledRamp::clamped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledRamp {
    stops: Vec<ColorStop>,
}

impl ResampledRamp {
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = f32> + '_ {
        self.stops.iter().map(|s| s.position)
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.stops.iter().map(|s| s.color)
    }

    /// Copy with every channel clamped into [0, 1].
    pub fn clamped(&self) -> Self {
        Self {
            stops: self
                .stops
                .iter()
                .map(|s| ColorStop::new(s.position, s.color.clamped()))
                .collect(),
        }
    }

    /// `(position, rgba)` pairs with opaque alpha.
    pub fn to_rgba_stops(&self) -> Vec<(f32, [f32; 4])> {
        self.stops
            .iter()
            .map(|s| (s.position, s.color.to_rgba()))
            .collect()
    }

    /// Piecewise-linear lookup, extrapolating past the first and last stop.
    pub fn evaluate(&self, t: f32) -> Color {
        let positions: Vec<f32> = self.positions().collect();
        let colors: Vec<Color> = self.colors().collect();
        interpolate(&positions, &colors, t)
    }
}

impl From<ResampledRamp> for Vec<ColorStop> {
    fn from(ramp: ResampledRamp) -> Self {
        ramp.stops
    }
}

/// Resample `stops` onto `target_count` evenly spaced positions.
///
/// `stops` must be ordered by non-decreasing position, see [`resample_strict`]
/// for a validating variant. A first stop past 0 (or a last stop before 1) is
/// extended flat to the boundary before interpolating.
///
/// A list that already holds exactly `target_count` stops is returned as is,
/// even when its positions are not the even grid. Downstream ramps rely on
/// this pass-through.
pub fn resample(stops: &[ColorStop], target_count: usize) -> Result<ResampledRamp> {
    if target_count < 2 {
        return Err(Error::InvalidTargetCount(target_count));
    }
    if stops.is_empty() {
        return Err(Error::Format("a ramp needs at least one control point".into()));
    }
    if stops.len() == target_count {
        log::debug!("{} stops already match the ramp size, skipping resampling", target_count);
        return Ok(ResampledRamp {
            stops: stops.to_vec(),
        });
    }

    let mut positions: Vec<f32> = stops.iter().map(|s| s.position).collect();
    let mut colors: Vec<Color> = stops.iter().map(|s| s.color).collect();

    if positions[0] != 0. {
        positions.insert(0, 0.);
        colors.insert(0, colors[0]);
    }
    let last = positions.len() - 1;
    if positions[last] != 1. {
        positions.push(1.);
        colors.push(colors[last]);
    }

    let step = 1. / (target_count - 1) as f32;
    let stops = (0..target_count)
        .map(|i| {
            // pin the last sample so float drift never leaves it short of 1
            let t = if i == target_count - 1 { 1. } else { i as f32 * step };
            ColorStop::new(t, interpolate(&positions, &colors, t))
        })
        .collect();
    log::debug!(
        "resampled {} control points to {} stops",
        positions.len(),
        target_count
    );
    Ok(ResampledRamp { stops })
}

/// [`resample`] after checking that positions never decrease.
pub fn resample_strict(stops: &[ColorStop], target_count: usize) -> Result<ResampledRamp> {
    check_sorted(stops)?;
    resample(stops, target_count)
}

pub fn check_sorted(stops: &[ColorStop]) -> Result<()> {
    match stops
        .windows(2)
        .position(|pair| !(pair[0].position <= pair[1].position))
    {
        Some(i) => Err(Error::UnsortedInput { index: i + 1 }),
        None => Ok(()),
    }
}

/// Linear interpolation of `colors` over `positions`, each channel on its own.
///
/// Segment choice follows a left binary search: the upper knot is the first
/// one at or past `t`, bounded to `[1, n - 1]`, so values outside the knots
/// extrapolate along the first or last segment. A zero-width segment returns
/// its upper color.
fn interpolate(positions: &[f32], colors: &[Color], t: f32) -> Color {
    if positions.len() == 1 {
        return colors[0];
    }
    let n = positions.len();
    let hi = positions
        .iter()
        .position(|&p| p >= t)
        .unwrap_or(n - 1)
        .clamp(1, n - 1);
    let lo = hi - 1;
    let span = positions[hi] - positions[lo];
    if span == 0. {
        return colors[hi];
    }
    let w = (t - positions[lo]) / span;
    colors[lo].lerp(&colors[hi], w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0., Color::RED),
            ColorStop::new(0.5, Color::GREEN),
            ColorStop::new(1., Color::BLUE),
        ]
    }

    fn close(a: Color, b: Color) -> bool {
        a.max_abs_diff(&b) < 1e-5
    }

    #[test]
    fn four_point_grid() {
        let ramp = resample(&rgb_stops(), 4).unwrap();
        let positions: Vec<f32> = ramp.positions().collect();
        assert_eq!(positions.len(), 4);
        assert!((positions[1] - 1. / 3.).abs() < 1e-6);
        assert!((positions[2] - 2. / 3.).abs() < 1e-6);
        assert_eq!(positions[3], 1.);
        assert!(close(ramp.stops()[1].color, Color::new(1. / 3., 2. / 3., 0.)));
        assert!(close(ramp.stops()[2].color, Color::new(0., 2. / 3., 1. / 3.)));
        assert_eq!(ramp.stops()[0].color, Color::RED);
        assert_eq!(ramp.stops()[3].color, Color::BLUE);
    }

    #[test]
    fn flat_boundary_extension() {
        let stops = vec![
            ColorStop::new(0.2, Color::new(0.2, 0.4, 0.6)),
            ColorStop::new(0.6, Color::new(0.6, 0.4, 0.2)),
        ];
        let ramp = resample(&stops, RAMP_STOPS).unwrap();
        assert_eq!(ramp.stops()[0].color, Color::new(0.2, 0.4, 0.6));
        assert_eq!(ramp.stops()[RAMP_STOPS - 1].color, Color::new(0.6, 0.4, 0.2));
        // flat, not continued along the 0.2..0.6 slope
        assert_eq!(ramp.evaluate(0.1), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn exact_length_passes_through() {
        let stops: Vec<ColorStop> = (0..RAMP_STOPS)
            .map(|i| ColorStop::new((i as f32 / 40.).powi(2), Color::new(i as f32, 0., 0.)))
            .collect();
        let ramp = resample(&stops, RAMP_STOPS).unwrap();
        assert_eq!(ramp.stops(), stops.as_slice());
    }

    #[test]
    fn idempotent_on_full_ramp() {
        let once = resample(&rgb_stops(), RAMP_STOPS).unwrap();
        let twice = resample(once.stops(), RAMP_STOPS).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn single_stop_is_constant() {
        let ramp = resample(&[ColorStop::new(0.3, Color::GREEN)], 8).unwrap();
        assert!(ramp.colors().all(|c| c == Color::GREEN));
        assert_eq!(ramp.len(), 8);
    }

    #[test]
    fn duplicate_positions_take_upper_color() {
        let stops = vec![
            ColorStop::new(0., Color::RED),
            ColorStop::new(0.5, Color::RED),
            ColorStop::new(0.5, Color::BLUE),
            ColorStop::new(1., Color::BLUE),
        ];
        let ramp = resample(&stops, 3).unwrap();
        assert_eq!(ramp.stops()[1].color, Color::RED);
        assert_eq!(ramp.stops()[2].color, Color::BLUE);

        let c = interpolate(&[0., 0., 1.], &[Color::RED, Color::BLUE, Color::GREEN], 0.);
        assert_eq!(c, Color::BLUE);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(resample(&[], 32), Err(Error::Format(_))));
        assert!(matches!(
            resample(&rgb_stops(), 1),
            Err(Error::InvalidTargetCount(1))
        ));
        let mut unsorted = rgb_stops();
        unsorted.swap(0, 1);
        assert!(matches!(
            resample_strict(&unsorted, 32),
            Err(Error::UnsortedInput { index: 1 })
        ));
        assert!(resample_strict(&rgb_stops(), 32).is_ok());
    }

    #[test]
    fn evaluate_extrapolates_linearly() {
        let ramp = resample(
            &[ColorStop::new(0., Color::BLACK), ColorStop::new(1., Color::new(0.5, 0.5, 0.5))],
            2,
        )
        .unwrap();
        assert!(close(ramp.evaluate(2.), Color::WHITE));
        assert!(close(ramp.evaluate(-1.), Color::new(-0.5, -0.5, -0.5)));
    }

    #[test]
    fn clamped_copy() {
        let stops = vec![
            ColorStop::new(0., Color::new(-0.5, 0.5, 2.)),
            ColorStop::new(1., Color::WHITE),
        ];
        let ramp = resample(&stops, 4).unwrap().clamped();
        assert_eq!(ramp.stops()[0].color, Color::new(0., 0.5, 1.));
    }
}
