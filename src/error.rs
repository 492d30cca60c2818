//! Error types for catalog loading, resampling and persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a color ramp
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed colormap description or custom ramp file
    #[error("Invalid colormap description: {0}")]
    Format(String),

    /// All control points of a colormap share the same position
    #[error("Colormap '{name}' has a zero-width position span (every point at {position})")]
    DegenerateRange { name: String, position: f32 },

    /// Unknown colormap name
    #[error("Colormap not found: {0}")]
    NotFound(String),

    /// Control point positions decrease at `index`
    #[error("Control point {index} is positioned before its predecessor")]
    UnsortedInput { index: usize },

    /// A ramp needs at least two samples to span [0, 1]
    #[error("Cannot resample to {0} stops, at least 2 are required")]
    InvalidTargetCount(usize),

    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
