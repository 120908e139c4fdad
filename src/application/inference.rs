//! Inference service: validate → encode → classify one assessment.
//!
//! The classifier is loaded once at startup and shared read-only; the
//! service itself holds no per-request state.

use std::sync::Arc;

use crate::domain::{Assessment, AssessmentInput};
use crate::ports::RiskClassifier;
use crate::HeartGuardError;

/// Service for running a risk assessment against a fitted classifier.
pub struct InferenceService<C: RiskClassifier> {
    classifier: Arc<C>,
}

impl<C: RiskClassifier> Clone for InferenceService<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C: RiskClassifier> InferenceService<C> {
    /// Create a new inference service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Assess one patient.
    ///
    /// The input is range-checked, encoded with the training-time codes and
    /// classified; scaling happens inside the classifier.
    ///
    /// # Errors
    /// Returns `HeartGuardError::Validation` for out-of-range answers and
    /// `HeartGuardError::Model` if prediction fails.
    pub fn assess(&self, input: AssessmentInput) -> Result<Assessment, HeartGuardError> {
        input
            .validate()
            .map_err(|errors| HeartGuardError::Validation(errors.join("; ")))?;

        let record = input.encode();
        let prediction = self.classifier.predict(&record)?;
        let assessment = Assessment::new(input, record, prediction);

        tracing::info!(
            "Assessment {} complete: risk={}, confidence={:.1}%",
            assessment.id,
            prediction.label,
            prediction.confidence
        );

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelError, PatientRecord, Prediction, RiskLabel};

    /// Votes "high" whenever the encoded age is 60 or above.
    struct AgeThreshold;

    impl RiskClassifier for AgeThreshold {
        fn predict(&self, record: &PatientRecord) -> Result<Prediction, ModelError> {
            if record.age >= 60.0 {
                Ok(Prediction::from_votes([0.25, 0.75]))
            } else {
                Ok(Prediction::from_votes([0.9, 0.1]))
            }
        }
    }

    #[test]
    fn test_assess_returns_label_and_confidence() {
        let service = InferenceService::new(Arc::new(AgeThreshold));

        let high = service.assess(AssessmentInput::sample()).expect("Should assess");
        assert_eq!(high.prediction.label, RiskLabel::High);
        assert!((high.prediction.confidence - 75.0).abs() < 1e-9);
        assert_eq!(high.record, AssessmentInput::sample().encode());

        let low = service.assess(AssessmentInput::default()).expect("Should assess");
        assert_eq!(low.prediction.label, RiskLabel::Low);
        assert_ne!(high.id, low.id);
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let service = InferenceService::new(Arc::new(AgeThreshold));
        let input = AssessmentInput {
            cholesterol: 700,
            ..AssessmentInput::default()
        };
        match service.assess(input) {
            Err(HeartGuardError::Validation(msg)) => assert!(msg.contains("Cholesterol")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
