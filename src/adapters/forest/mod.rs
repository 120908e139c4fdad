//! Forest adapter: Implementation of RiskClassifier using aprender.
//!
//! The model is a pair of library objects:
//! - `StandardScaler` (per-feature mean and population std)
//! - `RandomForestClassifier` (bagged CART trees, vote-fraction probabilities)
//!
//! Both are fitted once by the training pipeline and then used read-only.
//! Neither is reimplemented here; this adapter only converts between the
//! domain's `f64` records and aprender's `f32` matrices.

use aprender::preprocessing::StandardScaler;
use aprender::tree::RandomForestClassifier;
use aprender::{Matrix, Transformer};
use serde::{Deserialize, Serialize};

use crate::domain::{ForestParams, ModelError, PatientRecord, Prediction, N_FEATURES};
use crate::ports::RiskClassifier;

/// Convert encoded records to a row-major feature matrix.
fn to_matrix(records: &[PatientRecord]) -> Result<Matrix<f32>, ModelError> {
    let data: Vec<f32> = records
        .iter()
        .flat_map(|r| r.to_vec().into_iter().map(|v| v as f32))
        .collect();
    Matrix::from_vec(records.len(), N_FEATURES, data).map_err(|e| ModelError::Shape(e.to_string()))
}

/// A forest needs at least one tree of depth one; an empty ensemble votes 0/0.
fn check_params(params: ForestParams) -> Result<(), String> {
    if params.n_trees == 0 {
        return Err("n_trees must be at least 1".into());
    }
    if params.max_depth == 0 {
        return Err("max_depth must be at least 1".into());
    }
    Ok(())
}

/// Fitted scaler + forest pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    scaler: StandardScaler,
    forest: RandomForestClassifier,
    params: ForestParams,
}

impl ForestModel {
    /// Fit the scaler on the training partition, then the forest on the
    /// scaled training partition.
    ///
    /// # Errors
    /// Returns `ModelError::Fit` if the parameters describe an empty forest or
    /// the library rejects the data.
    pub fn fit(
        records: &[PatientRecord],
        labels: &[u8],
        params: ForestParams,
    ) -> Result<Self, ModelError> {
        check_params(params).map_err(ModelError::Fit)?;
        if records.is_empty() {
            return Err(ModelError::Fit("no training rows".into()));
        }
        if records.len() != labels.len() {
            return Err(ModelError::Shape(format!(
                "{} records but {} labels",
                records.len(),
                labels.len()
            )));
        }

        let x = to_matrix(records)?;
        let y: Vec<usize> = labels.iter().map(|&l| usize::from(l)).collect();

        let mut scaler = StandardScaler::new();
        let x_scaled = scaler
            .fit_transform(&x)
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        let mut forest = RandomForestClassifier::new(params.n_trees)
            .with_max_depth(params.max_depth)
            .with_random_state(params.random_state);
        forest
            .fit(&x_scaled, &y)
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        tracing::info!(
            "Fitted forest: n_trees={}, max_depth={}, n_samples={}",
            params.n_trees,
            params.max_depth,
            records.len()
        );

        Ok(Self {
            scaler,
            forest,
            params,
        })
    }

    /// Reassemble a model from separately persisted parts.
    ///
    /// # Errors
    /// Returns `ModelError::NotFitted` if the scaler was never fitted, or
    /// `ModelError::Shape` if it was fitted on a different feature count or
    /// the recorded parameters describe an empty forest.
    pub fn from_parts(
        scaler: StandardScaler,
        forest: RandomForestClassifier,
        params: ForestParams,
    ) -> Result<Self, ModelError> {
        check_params(params).map_err(ModelError::Shape)?;
        if !scaler.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        if scaler.mean().len() != N_FEATURES {
            return Err(ModelError::Shape(format!(
                "scaler fitted on {} features, expected {N_FEATURES}",
                scaler.mean().len()
            )));
        }
        Ok(Self {
            scaler,
            forest,
            params,
        })
    }

    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    #[must_use]
    pub fn forest(&self) -> &RandomForestClassifier {
        &self.forest
    }

    #[must_use]
    pub fn params(&self) -> ForestParams {
        self.params
    }

    /// Per-feature training means, in feature order.
    #[must_use]
    pub fn feature_means(&self) -> Vec<f64> {
        self.scaler.mean().iter().map(|&m| f64::from(m)).collect()
    }

    /// Apply the fitted scaler to raw records.
    ///
    /// # Errors
    /// Returns `ModelError::Predict` if the scaler rejects the input.
    pub fn scale(&self, records: &[PatientRecord]) -> Result<Vec<Vec<f64>>, ModelError> {
        let scaled = self.scale_matrix(records)?;
        let (rows, cols) = scaled.shape();
        Ok((0..rows)
            .map(|i| (0..cols).map(|j| f64::from(scaled.get(i, j))).collect())
            .collect())
    }

    fn scale_matrix(&self, records: &[PatientRecord]) -> Result<Matrix<f32>, ModelError> {
        let x = to_matrix(records)?;
        self.scaler
            .transform(&x)
            .map_err(|e| ModelError::Predict(e.to_string()))
    }

    /// Per-class vote fractions for each record.
    ///
    /// # Errors
    /// Returns `ModelError::Predict` if scaling fails or the forest reports
    /// an unexpected number of classes.
    pub fn vote_fractions(&self, records: &[PatientRecord]) -> Result<Vec<[f64; 2]>, ModelError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let x_scaled = self.scale_matrix(records)?;
        let proba = self.forest.predict_proba(&x_scaled);

        let (rows, classes) = proba.shape();
        if rows != records.len() || classes != 2 {
            return Err(ModelError::Predict(format!(
                "expected {}x2 probabilities, got {rows}x{classes}",
                records.len()
            )));
        }

        (0..rows)
            .map(|i| {
                let votes = [f64::from(proba.get(i, 0)), f64::from(proba.get(i, 1))];
                if votes.iter().all(|v| v.is_finite()) {
                    Ok(votes)
                } else {
                    Err(ModelError::Predict(format!("non-finite vote fractions {votes:?}")))
                }
            })
            .collect()
    }
}

impl RiskClassifier for ForestModel {
    fn predict(&self, record: &PatientRecord) -> Result<Prediction, ModelError> {
        let votes = self
            .vote_fractions(std::slice::from_ref(record))?
            .pop()
            .ok_or_else(|| ModelError::Predict("empty prediction".into()))?;
        Ok(Prediction::from_votes(votes))
    }

    fn predict_batch(&self, records: &[PatientRecord]) -> Result<Vec<Prediction>, ModelError> {
        Ok(self
            .vote_fractions(records)?
            .into_iter()
            .map(Prediction::from_votes)
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{AssessmentInput, ChestPainType, Thalassemia, YesNo};

    /// Deterministic synthetic cohort: risk rises with age, exercise angina,
    /// ST depression and vessel count.
    pub(crate) fn synthetic_cohort(n: usize) -> (Vec<PatientRecord>, Vec<u8>) {
        (0..n)
            .map(|i| {
                let sick = i % 2 == 1;
                let jitter = (i % 7) as u32;
                let input = AssessmentInput {
                    age: if sick { 58 + jitter } else { 40 + jitter },
                    chest_pain: if sick {
                        ChestPainType::Asymptomatic
                    } else {
                        ChestPainType::NonAnginalPain
                    },
                    resting_bp: 120 + jitter * 3,
                    cholesterol: 200 + jitter * 10,
                    max_heart_rate: if sick { 125 + jitter } else { 170 + jitter },
                    exercise_angina: if sick { YesNo::Yes } else { YesNo::No },
                    st_depression: if sick { 2.0 + f64::from(jitter) * 0.1 } else { 0.2 },
                    major_vessels: if sick { (1 + i % 3) as u8 } else { 0 },
                    thalassemia: if sick {
                        Thalassemia::ReversibleDefect
                    } else {
                        Thalassemia::Normal
                    },
                    ..AssessmentInput::default()
                };
                (input.encode(), u8::from(sick))
            })
            .unzip()
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_trees: 15,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_fit_and_predict_separable_cohort() {
        let (records, labels) = synthetic_cohort(60);
        let model = ForestModel::fit(&records, &labels, small_params()).expect("Should fit");

        let preds = model.predict_batch(&records).expect("Should predict");
        let correct = preds
            .iter()
            .zip(&labels)
            .filter(|(p, &l)| p.label.class() == usize::from(l))
            .count();
        assert!(correct >= 54, "expected >= 90% train accuracy, got {correct}/60");

        for p in &preds {
            assert!((p.vote_fractions[0] + p.vote_fractions[1] - 1.0).abs() < 1e-4);
            assert!(p.confidence >= 50.0 && p.confidence <= 100.0);
        }
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let (records, labels) = synthetic_cohort(40);
        let model = ForestModel::fit(&records, &labels, small_params()).expect("Should fit");
        let patient = AssessmentInput::sample().encode();

        let first = model.predict(&patient).expect("Should predict");
        for _ in 0..5 {
            assert_eq!(model.predict(&patient).expect("Should predict"), first);
        }

        let refit = ForestModel::fit(&records, &labels, small_params()).expect("Should fit");
        assert_eq!(refit.predict(&patient).expect("Should predict"), first);
    }

    #[test]
    fn test_feature_at_training_mean_scales_to_zero() {
        let (records, labels) = synthetic_cohort(40);
        let model = ForestModel::fit(&records, &labels, small_params()).expect("Should fit");

        let at_mean = PatientRecord::from_vec(&model.feature_means()).expect("13 means");
        let scaled = model.scale(&[at_mean]).expect("Should scale");
        assert_eq!(scaled[0].len(), N_FEATURES);
        for v in &scaled[0] {
            assert!(v.abs() < 1e-5, "scaled mean should be 0, got {v}");
        }
    }

    #[test]
    fn test_from_parts_rejects_unfitted_scaler() {
        let err = ForestModel::from_parts(
            StandardScaler::new(),
            RandomForestClassifier::new(3),
            ForestParams::default(),
        );
        assert!(matches!(err, Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_fit_rejects_empty_forest() {
        let (records, labels) = synthetic_cohort(20);
        for params in [
            ForestParams { n_trees: 0, ..small_params() },
            ForestParams { max_depth: 0, ..small_params() },
        ] {
            let err = ForestModel::fit(&records, &labels, params);
            assert!(matches!(err, Err(ModelError::Fit(_))), "accepted {params:?}");
        }
    }

    #[test]
    fn test_from_parts_rejects_zero_tree_params() {
        let (records, labels) = synthetic_cohort(20);
        let model = ForestModel::fit(&records, &labels, small_params()).expect("Should fit");
        let err = ForestModel::from_parts(
            model.scaler().clone(),
            model.forest().clone(),
            ForestParams { n_trees: 0, ..small_params() },
        );
        assert!(matches!(err, Err(ModelError::Shape(_))));
    }

    #[test]
    fn test_fit_rejects_mismatched_labels() {
        let (records, _) = synthetic_cohort(10);
        let err = ForestModel::fit(&records, &[0, 1], small_params());
        assert!(matches!(err, Err(ModelError::Shape(_))));
    }
}
