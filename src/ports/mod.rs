//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (ML library, dataset files,
//! artifact storage).

mod artifacts;
mod classifier;
mod dataset;

pub use artifacts::ArtifactStore;
pub use classifier::RiskClassifier;
pub use dataset::DatasetSource;
