//! Domain layer: Core business types and logic.
//!
//! This module contains the data contract shared by training and serving:
//! the fixed 13-feature record, the form choices and their integer codes,
//! the cleaning rules and the prediction types.

pub mod choices;
mod dataset;
mod diagnosis;
mod model;
mod patient;

pub use choices::{ChestPainType, Choice, RestingEcg, Sex, StSlope, Thalassemia, YesNo};
pub use dataset::{
    clean_rows, collapse_label, stratified_split, CleanDataset, CleaningSummary, DatasetError,
    SplitIndices, MISSING_MARKER, N_COLUMNS,
};
pub use diagnosis::{Assessment, Prediction, RiskLabel};
pub use model::{ForestParams, ModelError, PIPELINE_VERSION};
pub use patient::{AssessmentInput, PatientRecord, FEATURE_NAMES, N_FEATURES};
