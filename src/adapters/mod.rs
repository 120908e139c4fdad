//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `forest`: aprender scaler + random forest behind `RiskClassifier`
//! - `artifacts`: JSON artifact pair with a SHA-256 manifest
//! - `csv`: headerless CSV dataset reader
//! - `sanitize`: patient-data filtering for logs

pub mod artifacts;
pub mod csv;
pub mod forest;
pub mod sanitize;

// Re-export artifact error for lib.rs
pub use artifacts::ArtifactError;
