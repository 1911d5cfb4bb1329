//! Error types for figure rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while composing, rasterising or encoding a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Grids and axes handed to the renderer disagree on shape.
    #[error("invalid figure input: {0}")]
    InvalidInput(String),

    /// A style names a colour map or colour that cannot be resolved.
    #[error("invalid style: {0}")]
    InvalidStyle(String),

    /// The composed SVG could not be parsed back for rasterisation.
    #[error("SVG parse failed: {0}")]
    Svg(String),

    /// The raster canvas could not be allocated.
    #[error("rasterisation failed: {0}")]
    Raster(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(String),
}
