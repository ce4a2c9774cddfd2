//! Error types for gpc-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gpc-sheets-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row index outside the grid (index, row count)
    #[error("Row index {0} out of bounds (rows: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index outside the grid (index, column count)
    #[error("Column index {0} out of bounds (columns: {1})")]
    ColumnOutOfBounds(u16, u16),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
