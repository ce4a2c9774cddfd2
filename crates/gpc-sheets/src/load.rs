//! Spreadsheet loading by file extension

use std::io::Cursor;
use std::path::Path;

use gpc_sheets_core::Grid;
use gpc_sheets_xls::{XlsError, XlsReader};
use gpc_sheets_xlsx::{XlsxError, XlsxReader};
use thiserror::Error;

/// Spreadsheet container formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Office Open XML workbook (`.xlsx`)
    Xlsx,
    /// Legacy BIFF8 workbook (`.xls`)
    Xls,
}

impl SpreadsheetFormat {
    /// Detect the format from a file name's extension, case-insensitively.
    pub fn from_name(name: impl AsRef<Path>) -> Option<Self> {
        let extension = name
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") => Some(SpreadsheetFormat::Xlsx),
            Some("xls") => Some(SpreadsheetFormat::Xls),
            _ => None,
        }
    }
}

/// Failure reading a recognized spreadsheet format
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    #[error(transparent)]
    Xls(#[from] XlsError),
}

/// Per-file loading failure. The file is skipped; other files are unaffected.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Extension is neither `.xls` nor `.xlsx`
    #[error("Unsupported file format for {file}. Please upload a .xls or .xlsx file.")]
    UnsupportedFormat { file: String },

    /// The file could not be read as its format
    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: ReadError,
    },
}

impl LoadError {
    /// Name of the file that failed
    pub fn file(&self) -> &str {
        match self {
            LoadError::UnsupportedFormat { file } | LoadError::Read { file, .. } => file,
        }
    }

    fn read(file: &str, source: impl Into<ReadError>) -> Self {
        LoadError::Read {
            file: file.to_string(),
            source: source.into(),
        }
    }
}

fn detect(file: &str) -> Result<SpreadsheetFormat, LoadError> {
    SpreadsheetFormat::from_name(file).ok_or_else(|| LoadError::UnsupportedFormat {
        file: file.to_string(),
    })
}

/// Read the first worksheet of a spreadsheet on disk.
pub fn open_grid(path: impl AsRef<Path>) -> Result<Grid, LoadError> {
    let path = path.as_ref();
    let file = display_name(path);

    match detect(&file)? {
        SpreadsheetFormat::Xlsx => XlsxReader::read_file(path).map_err(|e| LoadError::read(&file, e)),
        SpreadsheetFormat::Xls => XlsReader::read_file(path).map_err(|e| LoadError::read(&file, e)),
    }
}

/// Read the first worksheet of an in-memory spreadsheet named `name`.
pub fn read_grid(name: &str, bytes: &[u8]) -> Result<Grid, LoadError> {
    match detect(name)? {
        SpreadsheetFormat::Xlsx => {
            XlsxReader::read(Cursor::new(bytes)).map_err(|e| LoadError::read(name, e))
        }
        SpreadsheetFormat::Xls => {
            XlsReader::read(Cursor::new(bytes)).map_err(|e| LoadError::read(name, e))
        }
    }
}

/// The key a file is stored under: its final path component.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_name() {
        assert_eq!(SpreadsheetFormat::from_name("a.xlsx"), Some(SpreadsheetFormat::Xlsx));
        assert_eq!(SpreadsheetFormat::from_name("A.XLS"), Some(SpreadsheetFormat::Xls));
        assert_eq!(SpreadsheetFormat::from_name("report.csv"), None);
        assert_eq!(SpreadsheetFormat::from_name("xlsx"), None);
        assert_eq!(SpreadsheetFormat::from_name("data.xlsm"), None);
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = read_grid("notes.txt", b"hello").unwrap_err();
        assert_eq!(err.file(), "notes.txt");
        assert_eq!(
            err.to_string(),
            "Unsupported file format for notes.txt. Please upload a .xls or .xlsx file."
        );
    }

    #[test]
    fn test_corrupt_file_is_read_error() {
        let err = read_grid("broken.xlsx", b"not a zip").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Read {
                source: ReadError::Xlsx(_),
                ..
            }
        ));

        let err = read_grid("broken.xls", b"not ole").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Read {
                source: ReadError::Xls(_),
                ..
            }
        ));
    }

    #[test]
    fn test_display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/tmp/run 1/PE-1.xlsx")), "PE-1.xlsx");
    }
}
