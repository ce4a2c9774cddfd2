//! # gpc-sheets-xlsx
//!
//! XLSX (Office Open XML) reader for gpc-sheets.
//!
//! Only cell values are read: styles, comments and formulas are ignored, and
//! formula cells contribute their cached result.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
