//! Classifier hyperparameters and model errors.

use serde::{Deserialize, Serialize};

/// Version of the cleaning/encoding/scaling pipeline.
///
/// Bump whenever the transformation sequence or the feature order changes:
/// artifacts recorded with a different version are refused at load time.
pub const PIPELINE_VERSION: u32 = 1;

/// Error type for model operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model fitting failed: {0}")]
    Fit(String),

    #[error("Prediction failed: {0}")]
    Predict(String),

    #[error("Invalid input shape: {0}")]
    Shape(String),

    #[error("Model not fitted")]
    NotFitted,
}

/// Random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Seed for bootstrap sampling
    pub random_state: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 5,
            random_state: 42,
        }
    }
}
