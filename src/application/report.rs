//! Downloadable assessment report.
//!
//! Fixed-layout plain text: title, report id and timestamp, every answer with
//! its label and unit, the predicted label and confidence, and a disclaimer.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::domain::{Assessment, AssessmentInput};
use crate::HeartGuardError;

pub const REPORT_TITLE: &str = "HeartGuard Health Report";

pub const REPORT_DISCLAIMER: &str =
    "This report is for educational purposes only and not a substitute for professional medical advice.";

/// Answers as (label, value with unit) pairs, in form order.
#[must_use]
pub fn input_lines(input: &AssessmentInput) -> Vec<(&'static str, String)> {
    vec![
        ("Age", input.age.to_string()),
        ("Sex", input.sex.to_string()),
        ("Chest Pain Type", input.chest_pain.to_string()),
        ("Resting Blood Pressure", format!("{} mm Hg", input.resting_bp)),
        ("Serum Cholesterol", format!("{} mg/dl", input.cholesterol)),
        (
            "Fasting Blood Sugar > 120 mg/dl",
            input.fasting_blood_sugar.to_string(),
        ),
        ("Resting ECG Results", input.resting_ecg.to_string()),
        ("Maximum Heart Rate Achieved", input.max_heart_rate.to_string()),
        ("Exercise Induced Angina", input.exercise_angina.to_string()),
        ("ST Depression", format!("{:.1}", input.st_depression)),
        ("Peak Exercise ST Slope", input.st_slope.to_string()),
        ("Major Vessels Colored", input.major_vessels.to_string()),
        ("Thalassemia", input.thalassemia.to_string()),
    ]
}

/// Render the report text for an assessment.
#[must_use]
pub fn render_report(assessment: &Assessment, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let prediction = &assessment.prediction;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Report ID: {}", assessment.id);
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Patient Health Data:");
    for (label, value) in input_lines(&assessment.input) {
        let _ = writeln!(out, "  - {label}: {value}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Result: {}", prediction.label.headline());
    let _ = writeln!(out, "Confidence Score: {:.2}%", prediction.confidence);
    let _ = writeln!(out);
    let _ = writeln!(out, "{REPORT_DISCLAIMER}");
    out
}

/// File name for an assessment's report.
#[must_use]
pub fn report_file_name(assessment: &Assessment) -> String {
    format!("HeartGuard_Report_{}.txt", assessment.short_id())
}

/// Writes reports into a directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the report for `assessment`, returning its path.
    ///
    /// # Errors
    /// Returns `HeartGuardError::Io` if the directory or file cannot be written.
    pub fn write(&self, assessment: &Assessment) -> Result<PathBuf, HeartGuardError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(report_file_name(assessment));
        fs::write(&path, render_report(assessment, Utc::now()))?;
        tracing::info!("Report written to {}", path.display());
        Ok(path)
    }
}
