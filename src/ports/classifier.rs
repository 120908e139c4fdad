//! Classifier port: Trait for risk prediction.
//!
//! This trait abstracts the fitted scaler + forest pair from the
//! application logic.

use crate::domain::{ModelError, PatientRecord, Prediction};

/// Trait for a fitted, read-only risk classifier.
///
/// Implementations apply the persisted scaler to the encoded record before
/// voting, so callers always pass raw (unscaled) feature values.
pub trait RiskClassifier: Send + Sync {
    /// Predict the risk label and confidence for one record.
    ///
    /// # Errors
    /// Returns `ModelError::Predict` if scaling or voting fails.
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, ModelError>;

    /// Predict a batch of records, preserving order.
    ///
    /// # Errors
    /// Returns `ModelError::Predict` if any prediction fails.
    fn predict_batch(&self, records: &[PatientRecord]) -> Result<Vec<Prediction>, ModelError> {
        records.iter().map(|r| self.predict(r)).collect()
    }
}
