//! Dataset port: Source of raw training rows.

use crate::domain::DatasetError;

/// Trait for reading the raw dataset as string fields.
///
/// Rows are returned untouched; cleaning is applied by the caller so that
/// every source goes through the same rules.
pub trait DatasetSource {
    /// Read all raw rows.
    ///
    /// # Errors
    /// Returns `DatasetError::NotFound` if the source does not exist and
    /// `DatasetError::Read` if it cannot be parsed as delimited records.
    fn read_rows(&self) -> Result<Vec<Vec<String>>, DatasetError>;
}

impl DatasetSource for Vec<Vec<String>> {
    fn read_rows(&self) -> Result<Vec<Vec<String>>, DatasetError> {
        Ok(self.clone())
    }
}
