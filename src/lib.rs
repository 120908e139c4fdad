//! # HeartGuard
//!
//! Heart disease risk assessment built on a random-forest classifier.
//!
//! This crate provides:
//! - A training pipeline (clean → stratified split → scale → fit → evaluate → persist)
//! - An inference service applying the identical transformation at serve time
//! - A terminal UI walking a session through home, assessment and results
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient record, form choices, predictions, cleaning contract)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (aprender forest, CSV, filesystem artifacts)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, AssessmentInput, PatientRecord, Prediction, RiskLabel};

/// Result type for HeartGuard operations
pub type Result<T> = std::result::Result<T, HeartGuardError>;

/// Main error type for HeartGuard
#[derive(Debug, thiserror::Error)]
pub enum HeartGuardError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] domain::DatasetError),

    #[error("Model error: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
