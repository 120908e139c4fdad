//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

pub mod evaluation;
mod inference;
pub mod report;
mod training;

pub use evaluation::EvaluationReport;
pub use inference::InferenceService;
pub use report::ReportWriter;
pub use training::{TrainingConfig, TrainingOutcome, TrainingService};
