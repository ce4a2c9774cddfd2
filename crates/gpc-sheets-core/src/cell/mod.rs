//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod value;

pub use address::{column_index, CellAddress};
pub use value::{CellError, CellValue, SharedString, MISSING_TEXT};
