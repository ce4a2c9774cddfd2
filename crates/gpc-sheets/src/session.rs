//! Session store of extracted records

use std::path::Path;

use ahash::AHashMap;
use gpc_sheets_core::Grid;

use crate::extract::extract;
use crate::load::{display_name, open_grid, read_grid, LoadError};
use crate::record::FileRecord;

/// Extracted records keyed by file name.
///
/// Iteration follows first-insertion order. Storing a record under a name
/// that is already present replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<(String, FileRecord)>,
    index: AHashMap<String, usize>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under `name`, returning the record it replaced.
    pub fn insert(&mut self, name: impl Into<String>, record: FileRecord) -> Option<FileRecord> {
        self.store(name.into(), record).1
    }

    /// Extract a record from `grid` and store it under `name`.
    pub fn ingest(&mut self, name: impl Into<String>, grid: &Grid) -> &FileRecord {
        let name = name.into();
        log::debug!("ingesting {name}");
        let (i, replaced) = self.store(name, extract(grid));
        if replaced.is_some() {
            log::debug!("replaced existing record for {}", self.records[i].0);
        }
        &self.records[i].1
    }

    fn store(&mut self, name: String, record: FileRecord) -> (usize, Option<FileRecord>) {
        match self.index.get(&name) {
            Some(&i) => (i, Some(std::mem::replace(&mut self.records[i].1, record))),
            None => {
                let i = self.records.len();
                self.index.insert(name.clone(), i);
                self.records.push((name, record));
                (i, None)
            }
        }
    }

    /// Read a spreadsheet from disk and store its record under the file name.
    ///
    /// The session is untouched when the file cannot be loaded.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&FileRecord, LoadError> {
        let path = path.as_ref();
        let grid = open_grid(path)?;
        Ok(self.ingest(display_name(path), &grid))
    }

    /// Read an in-memory spreadsheet and store its record under `name`.
    pub fn load_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<&FileRecord, LoadError> {
        let grid = read_grid(name, bytes)?;
        Ok(self.ingest(name, &grid))
    }

    /// Load every file, returning the failures. Files that load are stored
    /// regardless of failures elsewhere in the batch.
    pub fn load_batch<I, P>(&mut self, paths: I) -> Vec<LoadError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut failures = Vec::new();
        for path in paths {
            if let Err(err) = self.load_file(path) {
                log::warn!("{err}");
                failures.push(err);
            }
        }
        failures
    }

    /// Get the record stored under `name`
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.index.get(name).map(|&i| &self.records[i].1)
    }

    /// Check whether a record is stored under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// File names in insertion order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(name, _)| name.as_str())
    }

    /// `(file name, record)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove and return the record stored under `name`
    pub fn remove(&mut self, name: &str) -> Option<FileRecord> {
        let i = self.index.remove(name)?;
        let (_, record) = self.records.remove(i);
        for (later, _) in &self.records[i..] {
            if let Some(slot) = self.index.get_mut(later) {
                *slot -= 1;
            }
        }
        Some(record)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Display name of a stored file: its sample name, else the file name
    /// when the record has no `"Sample name:"` entry.
    ///
    /// Returns `None` only when nothing is stored under `name`.
    pub fn sample_name(&self, name: &str) -> Option<String> {
        let record = self.get(name)?;
        Some(record.sample_name().unwrap_or_else(|| name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid_with_sample(sample: &str) -> Grid {
        let mut grid = Grid::new();
        grid.set_value_at(4, 0, "Sample name:").unwrap();
        grid.set_value_at(4, 1, sample).unwrap();
        grid.set_value_at(7, 8, "end").unwrap();
        grid
    }

    #[test]
    fn test_insertion_order_survives_replace() {
        let mut session = Session::new();
        session.ingest("b.xlsx", &grid_with_sample("B"));
        session.ingest("a.xlsx", &grid_with_sample("A"));
        session.ingest("b.xlsx", &grid_with_sample("B2"));

        assert_eq!(session.file_names().collect::<Vec<_>>(), vec!["b.xlsx", "a.xlsx"]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.sample_name("b.xlsx").as_deref(), Some("B2"));
    }

    #[test]
    fn test_remove_reindexes() {
        let mut session = Session::new();
        for name in ["a.xls", "b.xls", "c.xls"] {
            session.ingest(name, &Grid::new());
        }

        assert!(session.remove("a.xls").is_some());
        assert!(session.remove("a.xls").is_none());
        assert!(session.get("c.xls").is_some());
        assert_eq!(session.file_names().collect::<Vec<_>>(), vec!["b.xls", "c.xls"]);

        session.ingest("a.xls", &Grid::new());
        assert_eq!(session.file_names().last(), Some("a.xls"));
    }

    #[test]
    fn test_sample_name_fallback() {
        let mut session = Session::new();
        session.ingest("blank.xlsx", &Grid::new());
        assert_eq!(session.sample_name("blank.xlsx").as_deref(), Some("blank.xlsx"));
        assert_eq!(session.sample_name("missing.xlsx"), None);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.ingest("a.xlsx", &Grid::new());
        session.clear();
        assert!(session.is_empty());
        assert!(!session.contains("a.xlsx"));
    }
}
