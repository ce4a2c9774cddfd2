//! Plain-text rendering of extracted records

use std::fmt::{self, Display, Write as _};

use gpc_sheets_core::CellValue;

use crate::extract::{MWD_LOG_M, MWD_MMD, SCB_CH3, SCB_LOG_M};
use crate::record::{Dataset, FileRecord, Pair, Triple};
use crate::session::Session;

pub const REQUEST_INFO_TITLE: &str = "Dataset 1: Request Information";
pub const RESULTS_TITLE: &str = "Dataset 2: Results";
pub const PERFORMANCE_TITLE: &str = "Dataset 3: Performance";
pub const CALIBRATION_TITLE: &str = "Dataset 4: Calibration";
pub const MWD_TITLE: &str = "Dataset 5: MWD";
pub const SCB_TITLE: &str = "Dataset 6: SCB";

/// Text view of one record: heading, four tables and the two curves
pub struct RecordDisplay<'a> {
    name: &'a str,
    record: &'a FileRecord,
}

impl<'a> RecordDisplay<'a> {
    pub fn new(name: &'a str, record: &'a FileRecord) -> Self {
        Self { name, record }
    }
}

impl Display for RecordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        writeln!(f, "File: {}", self.name)?;

        section(f, REQUEST_INFO_TITLE)?;
        table(f, &record.request_info, &["parameter", "data"], |p: &Pair| {
            vec![cell(&p.parameter), cell(&p.data)]
        })?;
        for (title, dataset) in [
            (RESULTS_TITLE, &record.results),
            (PERFORMANCE_TITLE, &record.performance),
            (CALIBRATION_TITLE, &record.calibration),
        ] {
            section(f, title)?;
            table(f, dataset, &["parameter", "data", "unit"], |t: &Triple| {
                vec![cell(&t.parameter), cell(&t.data), cell(&t.unit)]
            })?;
        }

        section(f, MWD_TITLE)?;
        writeln!(f, "{}: {}", MWD_LOG_M.label, record.mwd.log_m)?;
        writeln!(f, "{}: {}", MWD_MMD.label, record.mwd.mmd)?;

        section(f, SCB_TITLE)?;
        writeln!(f, "{}: {}", SCB_LOG_M.label, record.scb.log_m)?;
        writeln!(f, "{}: {}", SCB_CH3.label, record.scb.ch3_per_1000_tc)?;
        writeln!(f, "---")
    }
}

/// Text view of every record in a session, in insertion order
pub struct SessionDisplay<'a>(pub &'a Session);

impl Display for SessionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No files uploaded yet.");
        }
        writeln!(f, "All Extracted Data")?;
        for (name, record) in self.0.iter() {
            writeln!(f)?;
            RecordDisplay::new(name, record).fmt(f)?;
        }
        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")
}

fn cell(value: &CellValue) -> String {
    value.to_string()
}

fn table<T>(
    f: &mut fmt::Formatter<'_>,
    dataset: &Dataset<T>,
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> fmt::Result {
    let entries = match dataset {
        Dataset::Rows(entries) => entries,
        Dataset::Unavailable(reason) => return writeln!(f, "(unavailable: {reason})"),
    };

    let rows: Vec<Vec<String>> = entries.iter().map(row).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, text) in widths.iter_mut().zip(cells) {
            *width = (*width).max(text.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let mut out = String::new();
        for (i, (text, &width)) in cells.iter().zip(&widths).enumerate() {
            if i > 0 {
                out.push_str(" | ");
            }
            let _ = write!(out, "{text:<width$}");
        }
        out.trim_end().to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    writeln!(f, "{}", line(header.as_slice()))?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(f, "{}", line(rule.as_slice()).replace(" | ", "-+-"))?;
    for cells in &rows {
        writeln!(f, "{}", line(cells.as_slice()))?;
    }
    Ok(())
}
