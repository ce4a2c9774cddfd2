//! # gpc-sheets
//!
//! Extract Gel Permeation Chromatography report data from `.xls` / `.xlsx`
//! spreadsheets and compare samples on a dual-axis MWD / SCB plot.
//!
//! ## Features
//!
//! - Value-only readers for XLSX and legacy XLS (BIFF8) workbooks
//! - Six datasets per report: request information, results, performance,
//!   calibration, molecular weight distribution and short chain branching
//! - A session store keyed by file name, in upload order
//! - Comparison plots with per-file warnings and PNG export
//!
//! ## Example
//!
//! ```rust
//! use gpc_sheets::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_value("A5", "Sample name:").unwrap();
//! grid.set_value("B5", "PE-1").unwrap();
//! grid.set_value("Y2", "LogM").unwrap();
//! grid.set_value("Y3", 3.0).unwrap();
//! grid.set_value("Z2", "MMD").unwrap();
//! grid.set_value("Z3", 0.4).unwrap();
//! grid.set_value("J42", "end").unwrap();
//!
//! let mut session = Session::new();
//! session.ingest("pe1.xlsx", &grid);
//! assert_eq!(session.sample_name("pe1.xlsx").as_deref(), Some("PE-1"));
//!
//! let outcome = plot(&session, &PlotRequest::new(["pe1.xlsx"]).with_scb(false));
//! assert!(outcome.figure.is_some());
//! // let png = outcome.figure.unwrap().export_png().unwrap();
//! ```

pub mod display;
pub mod extract;
pub mod load;
pub mod plot;
pub mod prelude;
pub mod record;
pub mod session;

pub use display::{RecordDisplay, SessionDisplay};
pub use extract::{extract, MarkerColumn};
pub use load::{open_grid, read_grid, LoadError, ReadError, SpreadsheetFormat};
pub use plot::{
    plot, Figure, PlotDataset, PlotOutcome, PlotRequest, PlotWarning, SeriesError,
    EXPORT_FILE_NAME,
};
pub use record::{Dataset, FileRecord, Mwd, Pair, Scb, Series, Triple};
pub use session::Session;

// Re-export core types
pub use gpc_sheets_core::{CellAddress, CellError, CellValue, ColumnScan, Error, Grid, Result};

// Re-export chart types
pub use gpc_sheets_chart::{Chart, ChartError, ChartResult, RenderOptions};

// Re-export reader types
pub use gpc_sheets_xls::{XlsError, XlsReader};
pub use gpc_sheets_xlsx::{XlsxError, XlsxReader};
