//! Error types for time-grid assembly.

use thiserror::Error;

/// Result type alias using ProfilerError.
pub type ProfilerResult<T> = Result<T, ProfilerError>;

/// Primary error type for assembling profiler grids.
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// The `sampling_interval` declaration could not be read as `<N> minutes`.
    #[error("malformed sampling interval '{value}' in {source_label}")]
    MalformedCadence { source_label: String, value: String },

    /// Two participating sources, or two grids, disagree on shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A present source does not carry the requested variable.
    #[error("variable '{variable}' not found in {source_label}")]
    MissingVariable {
        variable: String,
        source_label: String,
    },

    /// A variable array does not match samples x levels.
    #[error("variable '{variable}' in {source_label} has {actual} values, expected {expected}")]
    InvalidShape {
        variable: String,
        source_label: String,
        expected: usize,
        actual: usize,
    },

    /// Axis parameters that cannot produce a time grid.
    #[error("invalid time axis: {0}")]
    InvalidAxis(String),
}

impl ProfilerError {
    /// Short classification used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfilerError::MalformedCadence { .. } => "malformed_cadence",
            ProfilerError::ShapeMismatch(_) => "shape_mismatch",
            ProfilerError::MissingVariable { .. } => "missing_variable",
            ProfilerError::InvalidShape { .. } => "invalid_shape",
            ProfilerError::InvalidAxis(_) => "invalid_axis",
        }
    }
}
