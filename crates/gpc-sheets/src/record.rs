//! File records
//!
//! A [`FileRecord`] holds the six datasets extracted from one GPC report.

use std::fmt;

use gpc_sheets_core::CellValue;

/// Literal shown in place of a series whose marker label is missing.
pub const NOT_FOUND_TEXT: &str = "Not found";

/// Literal shown in place of an MMD series with no numeric values.
pub const NO_NUMERIC_VALUES_TEXT: &str = "No numeric values found";

/// Parameter label whose data names the sample.
pub const SAMPLE_NAME_PARAMETER: &str = "Sample name:";

/// A `{parameter, data}` entry of the request information table.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pair {
    pub parameter: CellValue,
    pub data: CellValue,
}

/// A `{parameter, data, unit}` entry of the results, performance and
/// calibration tables.
///
/// An empty unit cell is stored as the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Triple {
    pub parameter: CellValue,
    pub data: CellValue,
    pub unit: CellValue,
}

/// A fixed-offset dataset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dataset<T> {
    /// Entries in fixed row order
    Rows(Vec<T>),
    /// A required cell lies outside the sheet; carries the reason
    Unavailable(String),
}

impl<T> Dataset<T> {
    /// Get the entries, if the dataset could be read
    pub fn rows(&self) -> Option<&[T]> {
        match self {
            Dataset::Rows(rows) => Some(rows),
            Dataset::Unavailable(_) => None,
        }
    }

    /// Check whether the dataset could be read
    pub fn is_available(&self) -> bool {
        matches!(self, Dataset::Rows(_))
    }
}

/// A column of values collected below a marker label
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Every non-empty cell below the marker, possibly none
    Values(Vec<CellValue>),
    /// The marker label does not occur in the column
    NotFound,
    /// The marker was found but nothing below it is numeric (MMD only)
    NoNumericValues,
}

impl Series {
    /// Get the collected values, if any were collected
    pub fn values(&self) -> Option<&[CellValue]> {
        match self {
            Series::Values(values) => Some(values),
            Series::NotFound | Series::NoNumericValues => None,
        }
    }

    /// The literal text of a sentinel state, `None` for values
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Series::Values(_) => None,
            Series::NotFound => Some(NOT_FOUND_TEXT),
            Series::NoNumericValues => Some(NO_NUMERIC_VALUES_TEXT),
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = match self {
            Series::Values(values) => values,
            _ => return f.write_str(self.sentinel().unwrap_or_default()),
        };

        f.write_str("[")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                CellValue::String(s) => write!(f, "'{}'", s.as_str())?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("]")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Series {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Series::Values(values) => values.serialize(serializer),
            Series::NotFound => serializer.serialize_str(NOT_FOUND_TEXT),
            Series::NoNumericValues => serializer.serialize_str(NO_NUMERIC_VALUES_TEXT),
        }
    }
}

/// Dataset 5: molecular weight distribution
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mwd {
    /// LogM, column Y
    pub log_m: Series,
    /// MMD, column Z, numeric values only
    pub mmd: Series,
}

/// Dataset 6: short chain branching
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scb {
    /// LogM, column AA
    pub log_m: Series,
    /// CH3 / 1000 TC, column AB
    pub ch3_per_1000_tc: Series,
}

/// Everything extracted from one spreadsheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileRecord {
    pub request_info: Dataset<Pair>,
    pub results: Dataset<Triple>,
    pub performance: Dataset<Triple>,
    pub calibration: Dataset<Triple>,
    pub mwd: Mwd,
    pub scb: Scb,
}

impl FileRecord {
    /// Data of the first `"Sample name:"` request entry, as text.
    ///
    /// A blank data cell still counts: the name is then the empty string.
    pub fn sample_name(&self) -> Option<String> {
        self.request_info
            .rows()?
            .iter()
            .find(|pair| pair.parameter.as_string() == Some(SAMPLE_NAME_PARAMETER))
            .map(|pair| pair.data.to_string())
    }
}
