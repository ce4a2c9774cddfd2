//! # gpc-sheets-xls
//!
//! XLS (BIFF8) reader for gpc-sheets.
//!
//! This crate handles the legacy Excel binary format (.xls). Only cell values
//! of the first worksheet are read; formula cells contribute their cached
//! result.

pub mod biff;
pub mod error;
pub mod reader;

pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
