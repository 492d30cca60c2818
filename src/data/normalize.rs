//! Value range detection backing the "from min / from max" remap that feeds
//! raw attribute values into the ramp's [0, 1] domain.

use serde::{Deserialize, Serialize};

use crate::scene::{AttributeSource, AttributeValues};

/// How remap bounds are derived from the data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizationMode {
    /// Each channel spans its own observed values.
    #[default]
    Auto,
    /// All channels share the union of their observed ranges.
    Global,
    /// Fixed caller bounds, the data is not inspected.
    None,
}

/// Whether the ramp is driven by one scalar or by three independent channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelLayout {
    /// Scalar values, vectors reduced to their length.
    #[default]
    Single,
    /// RGB-like data, one range per component.
    PerChannel,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: f32,
    pub max: f32,
}

impl ChannelRange {
    /// Range used when there is nothing to measure.
    pub const UNIT: ChannelRange = ChannelRange { min: 0., max: 1. };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Min and max of the finite values, `None` when there are none.
    pub fn observe(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f32::MAX, f32::MIN), |(min, max), v| (min.min(v), max.max(v)));
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn union(&self, other: &ChannelRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, other: &ChannelRange) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

impl Default for ChannelRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Data to measure.
#[derive(Debug, Copy, Clone)]
pub enum RangeInput<'a> {
    Scalar(&'a [f32]),
    Channels(&'a [[f32; 3]]),
}

impl RangeInput<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            RangeInput::Scalar(values) => values.is_empty(),
            RangeInput::Channels(values) => values.is_empty(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeOutput {
    Single(ChannelRange),
    PerChannel([ChannelRange; 3]),
}

impl RangeOutput {
    /// Range applied to channel `i` (0 = R, 1 = G, 2 = B).
    pub fn channel(&self, i: usize) -> ChannelRange {
        match self {
            RangeOutput::Single(range) => *range,
            RangeOutput::PerChannel(ranges) => ranges[i.min(2)],
        }
    }

    pub fn channels(&self) -> [ChannelRange; 3] {
        [self.channel(0), self.channel(1), self.channel(2)]
    }

    /// The union over every channel.
    pub fn envelope(&self) -> ChannelRange {
        match self {
            RangeOutput::Single(range) => *range,
            RangeOutput::PerChannel([r, g, b]) => r.union(g).union(b),
        }
    }

    fn unit(input: Option<&RangeInput>) -> Self {
        match input {
            Some(RangeInput::Channels(_)) => RangeOutput::PerChannel([ChannelRange::UNIT; 3]),
            _ => RangeOutput::Single(ChannelRange::UNIT),
        }
    }
}

/// Remap bounds handed to the shading backend: `from` maps linearly onto
/// `to`, with the result clamped so ramp lookups always stay in domain.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemapBounds {
    pub from: ChannelRange,
    pub to: ChannelRange,
    pub clamp: bool,
}

impl RemapBounds {
    pub fn new(from: ChannelRange) -> Self {
        Self {
            from,
            to: ChannelRange::UNIT,
            clamp: true,
        }
    }

    pub fn apply(&self, value: f32) -> f32 {
        let span = self.from.max - self.from.min;
        if span == 0. {
            return self.to.min;
        }
        let t = (value - self.from.min) / span;
        let mapped = self.to.min + t * (self.to.max - self.to.min);
        if self.clamp {
            let (lo, hi) = if self.to.min <= self.to.max {
                (self.to.min, self.to.max)
            } else {
                (self.to.max, self.to.min)
            };
            mapped.clamp(lo, hi)
        } else {
            mapped
        }
    }
}

/// Bounds for every channel, as the backend consumes them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Remap {
    Single(RemapBounds),
    PerChannel([RemapBounds; 3]),
}

impl From<RangeOutput> for Remap {
    fn from(output: RangeOutput) -> Self {
        match output {
            RangeOutput::Single(range) => Remap::Single(RemapBounds::new(range)),
            RangeOutput::PerChannel(ranges) => Remap::PerChannel(ranges.map(RemapBounds::new)),
        }
    }
}

impl Remap {
    pub fn channel(&self, i: usize) -> RemapBounds {
        match self {
            Remap::Single(bounds) => *bounds,
            Remap::PerChannel(bounds) => bounds[i.min(2)],
        }
    }
}

/// Compute remap bounds for `input`.
///
/// Missing or empty input yields `(0, 1)` whatever the mode. Otherwise
/// [`NormalizationMode::None`] returns `fixed` without looking at the values,
/// and the measuring modes fall back to `(0, 1)` only when no finite value
/// exists at all. In per-channel Auto a channel without finite values gets
/// `(0, 1)`; Global ignores such channels.
pub fn compute_range(
    input: Option<RangeInput>,
    mode: NormalizationMode,
    fixed: ChannelRange,
) -> RangeOutput {
    let input = match input {
        Some(input) if !input.is_empty() => input,
        other => {
            log::debug!("No values to measure, using the unit range");
            return RangeOutput::unit(other.as_ref());
        }
    };

    if mode == NormalizationMode::None {
        return match input {
            RangeInput::Scalar(_) => RangeOutput::Single(fixed),
            RangeInput::Channels(_) => RangeOutput::PerChannel([fixed; 3]),
        };
    }

    match input {
        RangeInput::Scalar(values) => match ChannelRange::observe(values.iter().copied()) {
            Some(range) => RangeOutput::Single(range),
            None => RangeOutput::unit(Some(&input)),
        },
        RangeInput::Channels(values) => {
            let ranges = [0, 1, 2].map(|c| ChannelRange::observe(values.iter().map(|v| v[c])));
            if mode == NormalizationMode::Global {
                // reduce the per-channel bounds, channels without finite values don't count
                return match ranges.iter().flatten().copied().reduce(|a, b| a.union(&b)) {
                    Some(shared) => RangeOutput::PerChannel([shared; 3]),
                    None => RangeOutput::unit(Some(&input)),
                };
            }
            RangeOutput::PerChannel(ranges.map(|r| r.unwrap_or(ChannelRange::UNIT)))
        }
    }
}

/// Read `attribute` of `object` from the scene and compute its range.
///
/// An unknown object, one without eligible geometry, or a missing attribute
/// all fall back to `(0, 1)`.
pub fn range_for_attribute<S: AttributeSource + ?Sized>(
    source: &S,
    object: &str,
    attribute: &str,
    layout: ChannelLayout,
    mode: NormalizationMode,
    fixed: ChannelRange,
) -> RangeOutput {
    let unit = match layout {
        ChannelLayout::Single => RangeOutput::Single(ChannelRange::UNIT),
        ChannelLayout::PerChannel => RangeOutput::PerChannel([ChannelRange::UNIT; 3]),
    };
    if !source.has_geometry(object) {
        log::warn!("'{}' has no eligible geometry, using the unit range", object);
        return unit;
    }
    let Some(values) = source.attribute(object, attribute) else {
        log::warn!("'{}' has no attribute '{}', using the unit range", object, attribute);
        return unit;
    };

    match (layout, values) {
        (ChannelLayout::Single, AttributeValues::Scalar(values)) => {
            compute_range(Some(RangeInput::Scalar(values)), mode, fixed)
        }
        (ChannelLayout::Single, AttributeValues::Vector(values)) => {
            let magnitudes = crate::types::magnitudes(values);
            compute_range(Some(RangeInput::Scalar(&magnitudes)), mode, fixed)
        }
        (ChannelLayout::PerChannel, AttributeValues::Vector(values)) => {
            compute_range(Some(RangeInput::Channels(values)), mode, fixed)
        }
        (ChannelLayout::PerChannel, AttributeValues::Scalar(values)) => {
            let channels: Vec<[f32; 3]> = values.iter().map(|&v| [v; 3]).collect();
            compute_range(Some(RangeInput::Channels(&channels)), mode, fixed)
        }
    }
}
