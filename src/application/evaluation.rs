//! Held-out evaluation of a fitted classifier.
//!
//! Accuracy, averaged scores and the confusion matrix come from
//! `aprender::metrics::classification`; per-class rows are read off the
//! confusion matrix so both classes are always reported, even when one of
//! them never appears in the predictions.

use std::fmt;

use aprender::metrics::classification::{
    accuracy, confusion_matrix, f1_score, precision, recall, Average,
};
use serde::Serialize;

use crate::domain::ModelError;

/// Display names for class 0 and class 1.
pub const CLASS_NAMES: [&str; 2] = ["No Disease", "Disease"];

/// Precision / recall / F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision / recall / F1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Classification report for the binary risk model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub classes: [ClassMetrics; 2],
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    /// `confusion[actual][predicted]`
    pub confusion: [[usize; 2]; 2],
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn harmonic(p: f64, r: f64) -> f64 {
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

impl EvaluationReport {
    /// Score predictions against true labels.
    ///
    /// # Errors
    /// Returns `ModelError::Shape` if the slices are empty, differ in length
    /// or contain a label other than 0 or 1.
    pub fn compute(y_pred: &[usize], y_true: &[usize]) -> Result<Self, ModelError> {
        if y_true.is_empty() || y_pred.len() != y_true.len() {
            return Err(ModelError::Shape(format!(
                "cannot evaluate {} predictions against {} labels",
                y_pred.len(),
                y_true.len()
            )));
        }
        if let Some(bad) = y_true.iter().chain(y_pred).find(|&&l| l > 1) {
            return Err(ModelError::Shape(format!("unexpected class label {bad}")));
        }

        let cm = confusion_matrix(y_pred, y_true);
        let (n, _) = cm.shape();
        let mut confusion = [[0usize; 2]; 2];
        for (actual, row) in confusion.iter_mut().enumerate() {
            for (predicted, cell) in row.iter_mut().enumerate() {
                if actual < n && predicted < n {
                    *cell = cm.get(actual, predicted);
                }
            }
        }

        let classes = [0, 1].map(|c| {
            let tp = confusion[c][c];
            let predicted = confusion[0][c] + confusion[1][c];
            let support = confusion[c][0] + confusion[c][1];
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            ClassMetrics {
                precision,
                recall,
                f1: harmonic(precision, recall),
                support,
            }
        });

        let averaged = |average: Average| AveragedMetrics {
            precision: f64::from(precision(y_pred, y_true, average)),
            recall: f64::from(recall(y_pred, y_true, average)),
            f1: f64::from(f1_score(y_pred, y_true, average)),
        };

        // aprender sizes its averages by the largest label seen; with a
        // single class present, macro averages are taken over both rows here.
        let macro_avg = if n == 2 {
            averaged(Average::Macro)
        } else {
            AveragedMetrics {
                precision: (classes[0].precision + classes[1].precision) / 2.0,
                recall: (classes[0].recall + classes[1].recall) / 2.0,
                f1: (classes[0].f1 + classes[1].f1) / 2.0,
            }
        };

        Ok(Self {
            accuracy: f64::from(accuracy(y_pred, y_true)),
            classes,
            macro_avg,
            weighted_avg: averaged(Average::Weighted),
            confusion,
        })
    }

    /// Total number of evaluated rows.
    #[must_use]
    pub fn support(&self) -> usize {
        self.classes.iter().map(|c| c.support).sum()
    }

    /// Confusion matrix as a text table.
    #[must_use]
    pub fn confusion_table(&self) -> String {
        let mut out = String::from("Confusion matrix (rows = actual, columns = predicted)\n");
        out.push_str(&format!(
            "{:>12} {:>12} {:>12}\n",
            "", CLASS_NAMES[0], CLASS_NAMES[1]
        ));
        for (name, row) in CLASS_NAMES.iter().zip(&self.confusion) {
            out.push_str(&format!("{name:>12} {:>12} {:>12}\n", row[0], row[1]));
        }
        out
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, c) in CLASS_NAMES.iter().zip(&self.classes) {
            writeln!(
                f,
                "{name:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        for (name, avg) in [("macro avg", self.macro_avg), ("weighted avg", self.weighted_avg)] {
            writeln!(
                f,
                "{name:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                avg.precision,
                avg.recall,
                avg.f1,
                self.support()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_binary_report() {
        // 4 actual negatives (3 caught), 4 actual positives (2 caught)
        let y_true = [0, 0, 0, 0, 1, 1, 1, 1];
        let y_pred = [0, 0, 0, 1, 1, 1, 0, 0];
        let report = EvaluationReport::compute(&y_pred, &y_true).expect("Should score");

        assert!(close(report.accuracy, 5.0 / 8.0));
        assert_eq!(report.confusion, [[3, 1], [2, 2]]);
        assert_eq!(report.support(), 8);

        let neg = report.classes[0];
        assert!(close(neg.precision, 3.0 / 5.0));
        assert!(close(neg.recall, 3.0 / 4.0));
        assert_eq!(neg.support, 4);

        let pos = report.classes[1];
        assert!(close(pos.precision, 2.0 / 3.0));
        assert!(close(pos.recall, 0.5));

        assert!(close(
            report.macro_avg.precision,
            (neg.precision + pos.precision) / 2.0
        ));
        assert!(close(report.macro_avg.f1, (neg.f1 + pos.f1) / 2.0));
    }

    #[test]
    fn test_single_class_is_padded() {
        let report = EvaluationReport::compute(&[0, 0, 0], &[0, 0, 0]).expect("Should score");
        assert_eq!(report.confusion, [[3, 0], [0, 0]]);
        assert!(close(report.accuracy, 1.0));
        assert!(close(report.classes[1].precision, 0.0));
        assert!(close(report.macro_avg.recall, 0.5));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(EvaluationReport::compute(&[], &[]).is_err());
        assert!(EvaluationReport::compute(&[0], &[0, 1]).is_err());
        assert!(EvaluationReport::compute(&[2], &[1]).is_err());
    }

    #[test]
    fn test_text_layout() {
        let report = EvaluationReport::compute(&[0, 1, 1, 0], &[0, 1, 0, 0]).expect("Should score");
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("No Disease"));
        assert!(text.contains("weighted avg"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("accuracy") && l.ends_with('4')));

        let table = report.confusion_table();
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(3).is_some_and(|l| l.trim_start().starts_with("Disease")));
    }
}
