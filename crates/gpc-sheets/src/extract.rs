//! Dataset extraction from a report grid
//!
//! The GPC report layout is fixed: the four tables sit at literal cell
//! positions, while the two curves are located by a marker label in their
//! column and run down to the end of the sheet.

use std::ops::RangeInclusive;

use gpc_sheets_core::{column_index, CellValue, ColumnScan, Grid, Result};

use crate::record::{Dataset, FileRecord, Mwd, Pair, Scb, Series, Triple};

/// A marker-scanned column of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerColumn {
    /// Label used when the series is displayed
    pub label: &'static str,
    /// Zero-based column index
    pub column: u16,
    /// Exact text of the cell heading the series
    pub marker: &'static str,
}

pub const MWD_LOG_M: MarkerColumn = MarkerColumn {
    label: "LogM (Column Y)",
    column: column_index("Y"),
    marker: "LogM",
};

pub const MWD_MMD: MarkerColumn = MarkerColumn {
    label: "MMD (Column Z)",
    column: column_index("Z"),
    marker: "MMD",
};

pub const SCB_LOG_M: MarkerColumn = MarkerColumn {
    label: "LogM (Column AA)",
    column: column_index("AA"),
    marker: "LogM",
};

pub const SCB_CH3: MarkerColumn = MarkerColumn {
    label: "CH3 / 1000 TC (Column AB)",
    column: column_index("AB"),
    marker: "CH3 / 1000 TC",
};

const REQUEST_INFO_ROWS: RangeInclusive<u32> = 4..=7;
/// Two (parameter, data) column pairs per request row: A/B then H/I
const REQUEST_INFO_COLUMNS: [(u16, u16); 2] = [
    (column_index("A"), column_index("B")),
    (column_index("H"), column_index("I")),
];

const RESULTS_ROWS: RangeInclusive<u32> = 28..=35;
const RESULTS_COLUMNS: [u16; 3] = [column_index("A"), column_index("B"), column_index("C")];

const PERFORMANCE_COLUMNS: [u16; 3] = [column_index("E"), column_index("F"), column_index("G")];

const CALIBRATION_ROWS: RangeInclusive<u32> = 28..=35;
const CALIBRATION_COLUMNS: [u16; 3] = [column_index("H"), column_index("I"), column_index("J")];

/// Rows of the performance table: 28..=30 then 37..=41
fn performance_rows() -> impl Iterator<Item = u32> {
    (28..=30).chain(37..=41)
}

/// Extract all six datasets from a report grid.
///
/// Never fails: a table that runs off the sheet becomes
/// [`Dataset::Unavailable`] and a missing marker becomes
/// [`Series::NotFound`].
pub fn extract(grid: &Grid) -> FileRecord {
    let (rows, cols) = grid.dimensions();
    log::debug!("extracting report from {rows}x{cols} grid");

    FileRecord {
        request_info: dataset("request information", request_info(grid)),
        results: dataset("results", triples(grid, RESULTS_ROWS, RESULTS_COLUMNS)),
        performance: dataset(
            "performance",
            triples(grid, performance_rows(), PERFORMANCE_COLUMNS),
        ),
        calibration: dataset(
            "calibration",
            triples(grid, CALIBRATION_ROWS, CALIBRATION_COLUMNS),
        ),
        mwd: Mwd {
            log_m: scan(grid, &MWD_LOG_M),
            mmd: numeric_scan(grid, &MWD_MMD),
        },
        scb: Scb {
            log_m: scan(grid, &SCB_LOG_M),
            ch3_per_1000_tc: scan(grid, &SCB_CH3),
        },
    }
}

fn dataset<T>(name: &str, result: Result<Vec<T>>) -> Dataset<T> {
    match result {
        Ok(rows) => Dataset::Rows(rows),
        Err(err) => {
            log::warn!("{name} table unavailable: {err}");
            Dataset::Unavailable(err.to_string())
        }
    }
}

fn request_info(grid: &Grid) -> Result<Vec<Pair>> {
    let mut pairs = Vec::with_capacity(8);
    for row in REQUEST_INFO_ROWS {
        for (parameter, data) in REQUEST_INFO_COLUMNS {
            pairs.push(Pair {
                parameter: grid.value_at(row, parameter)?.clone(),
                data: grid.value_at(row, data)?.clone(),
            });
        }
    }
    Ok(pairs)
}

fn triples(
    grid: &Grid,
    rows: impl IntoIterator<Item = u32>,
    [parameter, data, unit]: [u16; 3],
) -> Result<Vec<Triple>> {
    rows.into_iter()
        .map(|row| {
            let unit = match grid.value_at(row, unit)? {
                CellValue::Empty => CellValue::string(""),
                value => value.clone(),
            };
            Ok(Triple {
                parameter: grid.value_at(row, parameter)?.clone(),
                data: grid.value_at(row, data)?.clone(),
                unit,
            })
        })
        .collect()
}

fn scan(grid: &Grid, column: &MarkerColumn) -> Series {
    match grid.scan_below(column.column, column.marker) {
        ColumnScan::Found(values) => {
            log::debug!("{}: {} values", column.label, values.len());
            Series::Values(values)
        }
        ColumnScan::NotFound => {
            log::debug!("{}: marker '{}' not found", column.label, column.marker);
            Series::NotFound
        }
    }
}

fn numeric_scan(grid: &Grid, column: &MarkerColumn) -> Series {
    match scan(grid, column) {
        Series::Values(values) => {
            let numeric: Vec<CellValue> = values.into_iter().filter(CellValue::is_numeric).collect();
            if numeric.is_empty() {
                Series::NoNumericValues
            } else {
                Series::Values(numeric)
            }
        }
        other => other,
    }
}
