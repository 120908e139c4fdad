//! Categorical form choices and their training-time integer codes.
//!
//! The dataset stores every categorical field as a small integer. The form
//! presents human-readable labels; each enum here owns both the label and
//! the code so the encoding and the report echo stay in step.

use serde::{Deserialize, Serialize};

/// A categorical field with a fixed, ordered set of options.
pub trait Choice: Copy + Sized + 'static {
    /// All options, in the order they are presented.
    const ALL: &'static [Self];

    /// Human-readable label.
    fn label(&self) -> &'static str;

    /// Integer code used by the dataset and the model.
    fn code(&self) -> u8;

    /// Position of this option within [`Choice::ALL`].
    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c.code() == self.code())
            .unwrap_or(0)
    }

    /// Labels of all options, in presentation order.
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($label:literal, $code:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Biological sex (1 = male, 0 = female).
    Sex {
        Male => ("Male", 1),
        Female => ("Female", 0),
    }
}

choice_enum! {
    /// Binary clinical flag (fasting blood sugar > 120 mg/dl, exercise angina).
    YesNo {
        No => ("No", 0),
        Yes => ("Yes", 1),
    }
}

choice_enum! {
    /// Chest pain type (`cp`).
    ChestPainType {
        TypicalAngina => ("Typical Angina", 0),
        AtypicalAngina => ("Atypical Angina", 1),
        NonAnginalPain => ("Non-anginal Pain", 2),
        Asymptomatic => ("Asymptomatic", 3),
    }
}

choice_enum! {
    /// Resting electrocardiographic result (`restecg`).
    RestingEcg {
        Normal => ("Normal", 0),
        StTAbnormality => ("ST-T wave abnormality", 1),
        LeftVentricularHypertrophy => ("Left ventricular hypertrophy", 2),
    }
}

choice_enum! {
    /// Slope of the peak exercise ST segment (`slope`).
    StSlope {
        Upsloping => ("Upsloping", 0),
        Flat => ("Flat", 1),
        Downsloping => ("Downsloping", 2),
    }
}

choice_enum! {
    /// Thalassemia (`thal`), stored as presentation index + 1.
    Thalassemia {
        Normal => ("Normal", 1),
        FixedDefect => ("Fixed defect", 2),
        ReversibleDefect => ("Reversible defect", 3),
    }
}
