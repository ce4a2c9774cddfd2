//! Cell grid
//!
//! A [`Grid`] is the untyped 2-D view of a single worksheet: no header row,
//! rows and columns zero-indexed, only non-empty cells stored.

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

static EMPTY: CellValue = CellValue::Empty;

/// Result of scanning a column for a marker label
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnScan {
    /// Marker found; every non-missing cell below it, in row order
    Found(Vec<CellValue>),
    /// No cell in the column equals the marker
    NotFound,
}

impl ColumnScan {
    /// Check whether the marker was found
    pub fn is_found(&self) -> bool {
        matches!(self, ColumnScan::Found(_))
    }

    /// Get the collected values, if the marker was found
    pub fn values(&self) -> Option<&[CellValue]> {
        match self {
            ColumnScan::Found(values) => Some(values),
            ColumnScan::NotFound => None,
        }
    }
}

/// Sparse row-based cell grid
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellValue>>`.
///
/// The grid extent is `(last non-empty row + 1, last non-empty column + 1)`,
/// so trailing empty rows and columns are not part of it. Reads inside the
/// extent return [`CellValue::Empty`] for absent cells; reads outside it fail
/// with [`Error::RowOutOfBounds`] / [`Error::ColumnOutOfBounds`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: BTreeMap<u32, BTreeMap<u16, CellValue>>,
    row_count: u32,
    col_count: u16,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in the grid extent
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Number of columns in the grid extent
    pub fn col_count(&self) -> u16 {
        self.col_count
    }

    /// Grid extent as `(rows, columns)`
    pub fn dimensions(&self) -> (u32, u16) {
        (self.row_count, self.col_count)
    }

    /// Check if the grid has no non-empty cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Set a cell value by row and column indices.
    ///
    /// Storing [`CellValue::Empty`] clears the cell and shrinks the extent if
    /// the cleared cell was on its edge.
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }

        let value = value.into();
        if value.is_empty() {
            if let Some(row_map) = self.rows.get_mut(&row) {
                row_map.remove(&col);
                if row_map.is_empty() {
                    self.rows.remove(&row);
                }
            }
            self.recompute_extent();
        } else {
            self.rows.entry(row).or_default().insert(col, value);
            self.row_count = self.row_count.max(row + 1);
            self.col_count = self.col_count.max(col + 1);
        }
        Ok(())
    }

    /// Set a cell value by address string (e.g., "A1")
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(addr.row, addr.col, value)
    }

    /// Get a stored cell. Returns `None` for empty cells, in or out of extent.
    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a cell value with positional bounds checking.
    pub fn value_at(&self, row: u32, col: u16) -> Result<&CellValue> {
        if row >= self.row_count {
            return Err(Error::RowOutOfBounds(row, self.row_count));
        }
        if col >= self.col_count {
            return Err(Error::ColumnOutOfBounds(col, self.col_count));
        }
        Ok(self.get(row, col).unwrap_or(&EMPTY))
    }

    /// Get a cell value by address string, with bounds checking
    pub fn value(&self, address: &str) -> Result<&CellValue> {
        let addr = CellAddress::parse(address)?;
        self.value_at(addr.row, addr.col)
    }

    /// Iterate the non-empty cells of a column starting at `from_row`, in row order.
    pub fn column_cells(&self, col: u16, from_row: u32) -> impl Iterator<Item = (u32, &CellValue)> {
        self.rows
            .range(from_row..)
            .filter_map(move |(row, cells)| cells.get(&col).map(|v| (*row, v)))
    }

    /// Find the first row whose cell in `col` is a string exactly equal to `marker`.
    pub fn find_in_column(&self, col: u16, marker: &str) -> Option<u32> {
        self.column_cells(col, 0)
            .find(|(_, value)| value.as_string() == Some(marker))
            .map(|(row, _)| row)
    }

    /// Locate `marker` in `col` and collect every cell below it that is not
    /// missing (see [`CellValue::is_missing`]).
    ///
    /// A column outside the grid extent has no marker.
    pub fn scan_below(&self, col: u16, marker: &str) -> ColumnScan {
        match self.find_in_column(col, marker) {
            Some(row) => ColumnScan::Found(
                self.column_cells(col, row + 1)
                    .filter(|(_, value)| !value.is_missing())
                    .map(|(_, value)| value.clone())
                    .collect(),
            ),
            None => ColumnScan::NotFound,
        }
    }

    fn recompute_extent(&mut self) {
        self.row_count = self.rows.keys().next_back().map_or(0, |r| r + 1);
        self.col_count = self
            .rows
            .values()
            .filter_map(|cells| cells.keys().next_back())
            .max()
            .map_or(0, |c| c + 1);
    }
}
