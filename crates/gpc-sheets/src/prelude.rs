//! Prelude module - common imports for gpc-sheets users
//!
//! ```rust
//! use gpc_sheets::prelude::*;
//! ```

// Cell types
pub use crate::{CellValue, Grid};

// Records and session
pub use crate::{Dataset, FileRecord, Series, Session};

// Plotting
pub use crate::{plot, Figure, PlotOutcome, PlotRequest, PlotWarning, RenderOptions, EXPORT_FILE_NAME};

// Display
pub use crate::{RecordDisplay, SessionDisplay};

// Errors
pub use crate::LoadError;
