//! Chart error types

use thiserror::Error;

/// Result type for chart operations
pub type ChartResult<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while rendering or exporting a chart
#[derive(Debug, Error)]
pub enum ChartError {
    /// Canvas size is zero or too large
    #[error("Invalid canvas size: {width}x{height} px")]
    InvalidDimensions { width: u32, height: u32 },

    /// Drawing backend failure
    #[error("Render error: {0}")]
    Render(String),

    /// Image encoding failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
