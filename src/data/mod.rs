mod catalog;
mod color;
mod custom;
mod normalize;
mod ramp;

pub use catalog::{load, ColormapCatalog, ColormapDefinition};
pub use color::Color;
pub use custom::CustomRamp;
pub use normalize::{
    compute_range, range_for_attribute, ChannelLayout, ChannelRange, NormalizationMode, RangeInput,
    RangeOutput, Remap, RemapBounds,
};
pub use ramp::{check_sorted, resample, resample_strict, ColorStop, ResampledRamp, RAMP_STOPS};
