//! # gpc-sheets-core
//!
//! Core data structures for the gpc-sheets workspace.
//!
//! This crate provides the fundamental types shared by the readers and the
//! extractor:
//! - [`CellValue`] - Represents cell values (numbers, strings, booleans, errors)
//! - [`CellAddress`] - A1-style cell addressing and column letters
//! - [`Grid`] - The untyped 2-D cell grid read from one worksheet
//! - [`ColumnScan`] - Result of a marker scan down a single column
//!
//! ## Example
//!
//! ```rust
//! use gpc_sheets_core::{CellValue, ColumnScan, Grid};
//!
//! let mut grid = Grid::new();
//! grid.set_value("Y3", "LogM").unwrap();
//! grid.set_value("Y4", 2.5).unwrap();
//! grid.set_value("Y6", 2.6).unwrap();
//!
//! let scan = grid.scan_below(24, "LogM");
//! assert_eq!(
//!     scan,
//!     ColumnScan::Found(vec![CellValue::Number(2.5), CellValue::Number(2.6)])
//! );
//! ```

pub mod cell;
pub mod error;
pub mod grid;

pub use cell::{column_index, CellAddress, CellError, CellValue, SharedString, MISSING_TEXT};
pub use error::{Error, Result};
pub use grid::{ColumnScan, Grid};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
