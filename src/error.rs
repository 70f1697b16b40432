//! Error types for contextual scoring.

use thiserror::Error;

/// The main error type for context loading and scoring.
#[derive(Error, Debug)]
pub enum ContextError {
    /// Kernel fit failed because the point cloud has a singular covariance.
    #[error("Singular distribution: cannot fit density over {points} points")]
    SingularDistribution {
        /// Number of points in the rejected cloud.
        points: usize,
    },

    /// Sampled density is flat, so min-max normalization has no range.
    #[error("Degenerate normalization: sampled density range [{min}, {max}] is empty")]
    DegenerateNormalization { min: f64, max: f64 },

    /// A strict weight configuration has no entry for a signal.
    #[error("Missing weight for signal: {0}")]
    MissingCategoryWeight(String),

    /// A window key that does not parse as an integer boundary.
    #[error("Invalid window '{key}' in {category}/{subtype}")]
    InvalidWindow {
        category: String,
        subtype: String,
        key: String,
    },

    /// A sub-type without any window.
    #[error("No windows in {category}/{subtype}")]
    EmptyWindows { category: String, subtype: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for context operations.
pub type Result<T> = std::result::Result<T, ContextError>;

impl From<serde_json::Error> for ContextError {
    fn from(err: serde_json::Error) -> Self {
        ContextError::Serialization(err.to_string())
    }
}
