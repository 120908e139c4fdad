//! CSV adapter: Implementation of DatasetSource for the raw heart dataset.
//!
//! The file has no header row. Records with the wrong field count are passed
//! through (`flexible`) so the cleaning rules can drop them like any other
//! unusable row.

use std::path::{Path, PathBuf};

use crate::domain::DatasetError;
use crate::ports::DatasetSource;

/// Headerless CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvDataset {
    fn read_rows(&self) -> Result<Vec<Vec<String>>, DatasetError> {
        if !self.path.is_file() {
            return Err(DatasetError::NotFound(self.path.clone()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DatasetError::Read(format!("{}: {e}", self.path.display())))?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                DatasetError::Read(format!("{} line {}: {e}", self.path.display(), line + 1))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!("Read {} raw rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clean_rows;
    use std::io::Write;

    #[test]
    fn test_reads_headerless_rows() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "63.0,1.0,1.0,145.0,233.0,1.0,2.0,150.0,0.0,2.3,3.0,0.0,6.0,0").expect("write");
        writeln!(file, "67.0,1.0,4.0,160.0,286.0,0.0,2.0,108.0,1.0,1.5,2.0,?,3.0,2").expect("write");
        writeln!(file, "41.0,0.0,2.0,130.0,204.0").expect("write");

        let rows = CsvDataset::new(file.path()).read_rows().expect("Should read");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 14);
        assert_eq!(rows[1][11], "?");
        assert_eq!(rows[2].len(), 5);

        let cleaned = clean_rows(rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.summary().dropped_rows, 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("heart.csv");
        match CsvDataset::new(&missing).read_rows() {
            Err(DatasetError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
