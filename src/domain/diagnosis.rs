//! Prediction result types.
//!
//! Represents the output of the random-forest heart disease classifier.

use serde::{Deserialize, Serialize};

use super::patient::{AssessmentInput, PatientRecord};

/// Binary risk label predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// Class 0: no disease
    Low,
    /// Class 1: disease present
    High,
}

impl RiskLabel {
    /// Map a class index to a label (0 = low, anything else = high).
    #[must_use]
    pub fn from_class(class: usize) -> Self {
        if class == 0 {
            Self::Low
        } else {
            Self::High
        }
    }

    /// Class index used by the model.
    #[must_use]
    pub fn class(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// Headline text shown on screen and in the report.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk of Heart Disease",
            Self::High => "High Risk of Heart Disease",
        }
    }

    /// Follow-up guidance shown under the headline.
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Low => "Your results suggest a lower likelihood. Continue to maintain a healthy lifestyle and have regular check-ups.",
            Self::High => "Your results suggest a significant likelihood. It is crucial to consult with a healthcare provider for a detailed evaluation and guidance.",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129), // Emerald (#10B981)
            Self::High => (244, 63, 94), // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of the forest vote for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label
    pub label: RiskLabel,

    /// Fraction of trees voting for the predicted label, as a percentage
    pub confidence: f64,

    /// Vote fraction per class (index 0 = low, 1 = high)
    pub vote_fractions: [f64; 2],
}

impl Prediction {
    /// Build a prediction from per-class vote fractions.
    ///
    /// The label is the class with the larger fraction; a tie resolves to
    /// the lower class index.
    #[must_use]
    pub fn from_votes(vote_fractions: [f64; 2]) -> Self {
        let class = usize::from(vote_fractions[1] > vote_fractions[0]);
        Self {
            label: RiskLabel::from_class(class),
            confidence: vote_fractions[class] * 100.0,
            vote_fractions,
        }
    }
}

/// Complete assessment record held in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier (used for the report file name)
    pub id: String,

    /// Answers as entered in the form
    pub input: AssessmentInput,

    /// Encoded feature vector fed to the model
    pub record: PatientRecord,

    /// The model prediction
    pub prediction: Prediction,

    /// Timestamp of the assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create a new assessment from its input and prediction.
    #[must_use]
    pub fn new(input: AssessmentInput, record: PatientRecord, prediction: Prediction) -> Self {
        Self {
            id: uuid_v4(),
            input,
            record,
            prediction,
            created_at: chrono::Utc::now(),
        }
    }

    /// Short identifier (first UUID group) for display and file names.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }
}

/// Generate a random UUID v4 string.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
