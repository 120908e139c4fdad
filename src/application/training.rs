//! Training service: clean → stratified split → scale → fit → evaluate → persist.
//!
//! Runs offline from the `heartguard-train` binary. Serving never calls into
//! this module; it only reads what [`TrainingService::persist`] wrote.

use crate::adapters::forest::ForestModel;
use crate::application::evaluation::EvaluationReport;
use crate::domain::{
    clean_rows, stratified_split, CleanDataset, CleaningSummary, DatasetError, ForestParams,
};
use crate::ports::{ArtifactStore, DatasetSource, RiskClassifier};
use crate::HeartGuardError;

/// Settings for one training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub params: ForestParams,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the stratified split
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            params: ForestParams::default(),
            test_size: 0.2,
            seed: 42,
        }
    }
}

/// Result of a training run.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: ForestModel,
    pub cleaning: CleaningSummary,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out evaluation of `model`
    pub evaluation: EvaluationReport,
}

/// Service for fitting the risk model from a dataset source.
pub struct TrainingService<D: DatasetSource> {
    source: D,
    config: TrainingConfig,
}

impl<D: DatasetSource> TrainingService<D> {
    pub fn new(source: D, config: TrainingConfig) -> Self {
        Self { source, config }
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Read and clean the dataset.
    ///
    /// # Errors
    /// Returns `DatasetError::NotFound`/`Read` from the source, or
    /// `DatasetError::Empty` if no row survives cleaning.
    pub fn load_dataset(&self) -> Result<CleanDataset, DatasetError> {
        let rows = self.source.read_rows()?;
        let dataset = clean_rows(rows);
        let summary = dataset.summary();

        tracing::info!(
            "Cleaned dataset: {} raw rows, {} kept, {} dropped",
            summary.raw_rows,
            summary.kept_rows,
            summary.dropped_rows
        );

        if dataset.is_empty() {
            return Err(DatasetError::Empty(summary.raw_rows));
        }
        Ok(dataset)
    }

    /// Run the full pipeline and evaluate on the held-out partition.
    ///
    /// # Errors
    /// Returns error if the dataset cannot be loaded or split, or fitting fails.
    pub fn train(&self) -> Result<TrainingOutcome, HeartGuardError> {
        let dataset = self.load_dataset()?;
        let [negatives, positives] = dataset.class_counts();
        tracing::debug!("Class balance: {negatives} without disease, {positives} with disease");

        let split = stratified_split(dataset.labels(), self.config.test_size, self.config.seed)?;
        let (train_x, train_y) = dataset.subset(&split.train);
        let (test_x, test_y) = dataset.subset(&split.test);

        tracing::info!(
            "Split {} rows: {} train, {} test (seed {})",
            dataset.len(),
            train_x.len(),
            test_x.len(),
            self.config.seed
        );

        let model = ForestModel::fit(&train_x, &train_y, self.config.params)?;

        let y_pred: Vec<usize> = model
            .predict_batch(&test_x)?
            .iter()
            .map(|p| p.label.class())
            .collect();
        let y_true: Vec<usize> = test_y.iter().map(|&l| usize::from(l)).collect();
        let evaluation = EvaluationReport::compute(&y_pred, &y_true)?;

        tracing::info!("Test accuracy: {:.4}", evaluation.accuracy);

        Ok(TrainingOutcome {
            model,
            cleaning: dataset.summary(),
            train_rows: train_x.len(),
            test_rows: test_x.len(),
            evaluation,
        })
    }

    /// Persist the fitted scaler and forest together.
    ///
    /// # Errors
    /// Returns error if the store fails to write the artifacts.
    pub fn persist<S>(&self, store: &S, outcome: &TrainingOutcome) -> Result<(), HeartGuardError>
    where
        S: ArtifactStore<Model = ForestModel>,
        S::Error: Into<HeartGuardError>,
    {
        store.save(&outcome.model).map_err(Into::into)
    }
}
