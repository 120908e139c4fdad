//! Patient data types for heart disease risk prediction.
//!
//! Based on the UCI Cleveland heart disease feature set.

use serde::{Deserialize, Serialize};

use super::choices::{ChestPainType, Choice, RestingEcg, Sex, StSlope, Thalassemia, YesNo};

/// Number of model features.
pub const N_FEATURES: usize = 13;

/// Feature names in training-time column order.
///
/// The scaler and the forest are order-sensitive, not name-sensitive:
/// changing this order invalidates every persisted artifact pair.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// One encoded patient record: 13 numeric features in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PatientRecord {
    /// Age in years
    pub age: f64,

    /// Sex: 1 = male, 0 = female
    pub sex: f64,

    /// Chest pain type code (0-3)
    pub cp: f64,

    /// Resting blood pressure in mm Hg
    pub trestbps: f64,

    /// Serum cholesterol in mg/dl
    pub chol: f64,

    /// Fasting blood sugar > 120 mg/dl: 1 = yes, 0 = no
    pub fbs: f64,

    /// Resting ECG result code (0-2)
    pub restecg: f64,

    /// Maximum heart rate achieved
    pub thalach: f64,

    /// Exercise induced angina: 1 = yes, 0 = no
    pub exang: f64,

    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment (0-2)
    pub slope: f64,

    /// Number of major vessels colored by fluoroscopy (0-4)
    pub ca: f64,

    /// Thalassemia code (1-3)
    pub thal: f64,
}

impl PatientRecord {
    /// Convert features to a vector for ML inference.
    /// Order matches [`FEATURE_NAMES`].
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Create a record from a vector in [`FEATURE_NAMES`] order.
    ///
    /// # Errors
    /// Returns error if vector length is not 13.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != N_FEATURES {
            return Err(format!("Expected {N_FEATURES} features, got {}", v.len()));
        }

        Ok(Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        })
    }
}

/// Raw assessment input as entered in the form.
///
/// Categorical answers are kept as typed choices; [`AssessmentInput::encode`]
/// maps them to the integer codes the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub age: u32,
    pub sex: Sex,
    pub chest_pain: ChestPainType,
    pub resting_bp: u32,
    pub cholesterol: u32,
    pub fasting_blood_sugar: YesNo,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u32,
    pub exercise_angina: YesNo,
    pub st_depression: f64,
    pub st_slope: StSlope,
    pub major_vessels: u8,
    pub thalassemia: Thalassemia,
}

impl Default for AssessmentInput {
    /// Form defaults: the first option of every choice and mid-range numbers.
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: YesNo::No,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: YesNo::No,
            st_depression: 1.0,
            st_slope: StSlope::Upsloping,
            major_vessels: 0,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl AssessmentInput {
    pub const AGE_RANGE: (u32, u32) = (1, 120);
    pub const RESTING_BP_RANGE: (u32, u32) = (90, 200);
    pub const CHOLESTEROL_RANGE: (u32, u32) = (100, 600);
    pub const MAX_HEART_RATE_RANGE: (u32, u32) = (60, 220);
    pub const ST_DEPRESSION_RANGE: (f64, f64) = (0.0, 6.2);
    pub const MAX_MAJOR_VESSELS: u8 = 4;

    /// Reference patient used by the form's sample-data shortcut.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: 63,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 145,
            cholesterol: 233,
            fasting_blood_sugar: YesNo::Yes,
            resting_ecg: RestingEcg::LeftVentricularHypertrophy,
            max_heart_rate: 150,
            exercise_angina: YesNo::No,
            st_depression: 2.3,
            st_slope: StSlope::Downsloping,
            major_vessels: 0,
            thalassemia: Thalassemia::FixedDefect,
        }
    }

    /// Validate that all inputs are within the allowed form ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let check = |errors: &mut Vec<String>, name: &str, v: u32, (lo, hi): (u32, u32)| {
            if !(lo..=hi).contains(&v) {
                errors.push(format!("{name} {v} out of range [{lo}, {hi}]"));
            }
        };

        check(&mut errors, "Age", self.age, Self::AGE_RANGE);
        check(&mut errors, "Resting BP", self.resting_bp, Self::RESTING_BP_RANGE);
        check(&mut errors, "Cholesterol", self.cholesterol, Self::CHOLESTEROL_RANGE);
        check(
            &mut errors,
            "Max heart rate",
            self.max_heart_rate,
            Self::MAX_HEART_RATE_RANGE,
        );

        let (lo, hi) = Self::ST_DEPRESSION_RANGE;
        if !self.st_depression.is_finite() || !(lo..=hi).contains(&self.st_depression) {
            errors.push(format!(
                "ST depression {} out of range [{lo}, {hi}]",
                self.st_depression
            ));
        }
        if self.major_vessels > Self::MAX_MAJOR_VESSELS {
            errors.push(format!(
                "Major vessels {} must be between 0 and {}",
                self.major_vessels,
                Self::MAX_MAJOR_VESSELS
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Encode the answers into the training-time feature vector.
    #[must_use]
    pub fn encode(&self) -> PatientRecord {
        PatientRecord {
            age: f64::from(self.age),
            sex: f64::from(self.sex.code()),
            cp: f64::from(self.chest_pain.code()),
            trestbps: f64::from(self.resting_bp),
            chol: f64::from(self.cholesterol),
            fbs: f64::from(self.fasting_blood_sugar.code()),
            restecg: f64::from(self.resting_ecg.code()),
            thalach: f64::from(self.max_heart_rate),
            exang: f64::from(self.exercise_angina.code()),
            oldpeak: self.st_depression,
            slope: f64::from(self.st_slope.code()),
            ca: f64::from(self.major_vessels),
            thal: f64::from(self.thalassemia.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_patient_encoding() {
        let record = AssessmentInput::sample().encode();
        assert_eq!(
            record.to_vec(),
            vec![63.0, 1.0, 0.0, 145.0, 233.0, 1.0, 2.0, 150.0, 0.0, 2.3, 2.0, 0.0, 2.0]
        );
    }

    #[test]
    fn test_encoding_always_yields_thirteen_values_in_order() {
        let mut input = AssessmentInput::default();
        for &sex in Sex::ALL {
            for &cp in ChestPainType::ALL {
                for &thal in Thalassemia::ALL {
                    input.sex = sex;
                    input.chest_pain = cp;
                    input.thalassemia = thal;
                    assert!(input.validate().is_ok());
                    let v = input.encode().to_vec();
                    assert_eq!(v.len(), N_FEATURES);
                    assert!((v[1] - f64::from(sex.code())).abs() < f64::EPSILON);
                    assert!((v[2] - f64::from(cp.code())).abs() < f64::EPSILON);
                    assert!((v[12] - f64::from(thal.code())).abs() < f64::EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_features_from_vec() {
        let v = vec![63.0, 1.0, 0.0, 145.0, 233.0, 1.0, 2.0, 150.0, 0.0, 2.3, 2.0, 0.0, 2.0];
        let record = PatientRecord::from_vec(&v).expect("Should parse");
        assert!((record.oldpeak - 2.3).abs() < f64::EPSILON);
        assert!((record.thal - 2.0).abs() < f64::EPSILON);
        assert!(PatientRecord::from_vec(&v[..12]).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(AssessmentInput::default().validate().is_ok());

        let invalid = AssessmentInput {
            age: 0,
            resting_bp: 250,
            st_depression: 6.3,
            major_vessels: 5,
            ..AssessmentInput::default()
        };
        let errors = invalid.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let edge = AssessmentInput {
            age: 120,
            resting_bp: 90,
            cholesterol: 600,
            max_heart_rate: 60,
            st_depression: 6.2,
            major_vessels: 4,
            ..AssessmentInput::default()
        };
        assert!(edge.validate().is_ok());
    }
}
