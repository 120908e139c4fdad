//! Dataset cleaning and splitting rules shared by training and serving.
//!
//! Cleaning drops rows instead of imputing: a row with the missing-value
//! marker, the wrong column count or any non-numeric field never reaches the
//! scaler. The drop is silent apart from the row counts in [`CleaningSummary`].

use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::patient::{PatientRecord, N_FEATURES};

/// Placeholder token marking a missing value in the raw dataset.
pub const MISSING_MARKER: &str = "?";

/// Columns per raw row: 13 features followed by the target.
pub const N_COLUMNS: usize = N_FEATURES + 1;

/// Error type for dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read dataset: {0}")]
    Read(String),

    #[error("No usable rows left after cleaning ({0} raw rows)")]
    Empty(usize),

    #[error("Invalid split: {0}")]
    InvalidSplit(String),
}

/// Row counts before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleaningSummary {
    pub raw_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Cleaned dataset: encoded feature records and binary labels.
#[derive(Debug, Clone, Default)]
pub struct CleanDataset {
    records: Vec<PatientRecord>,
    labels: Vec<u8>,
    summary: CleaningSummary,
}

/// Collapse a severity value (0-4) to a binary label.
#[must_use]
pub fn collapse_label(value: f64) -> u8 {
    if value > 0.0 {
        1
    } else {
        0
    }
}

fn parse_row(row: &[String]) -> Option<(PatientRecord, u8)> {
    if row.len() != N_COLUMNS {
        return None;
    }
    if row.iter().any(|field| field.trim() == MISSING_MARKER) {
        return None;
    }

    let mut values = Vec::with_capacity(N_COLUMNS);
    for field in row {
        let v: f64 = field.trim().parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        values.push(v);
    }

    let record = PatientRecord::from_vec(&values[..N_FEATURES]).ok()?;
    Some((record, collapse_label(values[N_FEATURES])))
}

/// Apply the cleaning rules to raw string rows.
///
/// Rows containing [`MISSING_MARKER`], rows with the wrong number of columns
/// and rows with any field that does not parse as a finite number are
/// dropped. The target column is collapsed with [`collapse_label`].
pub fn clean_rows<I>(rows: I) -> CleanDataset
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut records = Vec::new();
    let mut labels = Vec::new();
    let mut raw_rows = 0;

    for row in rows {
        raw_rows += 1;
        if let Some((record, label)) = parse_row(&row) {
            records.push(record);
            labels.push(label);
        }
    }

    let kept_rows = records.len();
    CleanDataset {
        records,
        labels,
        summary: CleaningSummary {
            raw_rows,
            kept_rows,
            dropped_rows: raw_rows - kept_rows,
        },
    }
}

impl CleanDataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn features(&self) -> &[PatientRecord] {
        &self.records
    }

    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    #[must_use]
    pub fn summary(&self) -> CleaningSummary {
        self.summary
    }

    /// Number of rows per class, indexed by label.
    #[must_use]
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }

    /// Select rows by index.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> (Vec<PatientRecord>, Vec<u8>) {
        indices
            .iter()
            .map(|&i| (self.records[i], self.labels[i]))
            .unzip()
    }

    /// Re-emit the cleaned data as raw string rows (features then label).
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .zip(&self.labels)
            .map(|(record, label)| {
                record
                    .to_vec()
                    .iter()
                    .map(|v| v.to_string())
                    .chain(std::iter::once(label.to_string()))
                    .collect()
            })
            .collect()
    }
}

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified shuffle split.
///
/// The test partition holds `ceil(n * test_size)` rows. Each class
/// contributes in proportion to its frequency, with at least one row each;
/// leftover slots go to the classes with the largest fractional share
/// (lower label first on ties).
/// The same seed always yields the same partition.
///
/// # Errors
/// Returns `DatasetError::InvalidSplit` if `test_size` is outside (0, 1),
/// either partition would miss a class, or a class has fewer than two rows.
pub fn stratified_split(
    labels: &[u8],
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, DatasetError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "test_size {test_size} must be in (0, 1)"
        )));
    }

    let n = labels.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DatasetError::InvalidSplit(format!(
            "{n} rows cannot be split with test_size {test_size}"
        )));
    }

    let mut by_class: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in labels.iter().enumerate() {
        by_class[usize::from(label.min(1))].push(i);
    }
    for (class, members) in by_class.iter().enumerate() {
        if members.len() < 2 {
            return Err(DatasetError::InvalidSplit(format!(
                "class {class} has {} rows; stratification needs at least 2",
                members.len()
            )));
        }
    }

    if n_test < by_class.len() {
        return Err(DatasetError::InvalidSplit(format!(
            "test partition of {n_test} rows cannot hold both classes"
        )));
    }
    if n_test > n - by_class.len() {
        return Err(DatasetError::InvalidSplit(format!(
            "test partition of {n_test} rows leaves a class without training rows"
        )));
    }

    // Largest-remainder allocation of test slots.
    let exact: Vec<f64> = by_class
        .iter()
        .map(|m| m.len() as f64 * n_test as f64 / n as f64)
        .collect();
    // Every class keeps at least one test row.
    let mut alloc: Vec<usize> = exact.iter().map(|e| (e.floor() as usize).max(1)).collect();
    let mut order: Vec<usize> = (0..by_class.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = exact[a] - exact[a].floor();
        let fb = exact[b] - exact[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    let mut remaining = n_test.saturating_sub(alloc.iter().sum::<usize>());
    for &class in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if alloc[class] < by_class[class].len() - 1 {
            alloc[class] += 1;
            remaining -= 1;
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (class, members) in by_class.iter_mut().enumerate() {
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..alloc[class]]);
        train.extend_from_slice(&members[alloc[class]..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(SplitIndices { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            row(&["63", "1", "1", "145", "233", "1", "2", "150", "0", "2.3", "3", "0", "6", "0"]),
            row(&["67", "1", "4", "160", "286", "0", "2", "108", "1", "1.5", "2", "3", "3", "2"]),
            row(&["67", "1", "4", "120", "229", "0", "2", "129", "1", "2.6", "2", "2", "7", "1"]),
            row(&["37", "1", "3", "130", "250", "0", "0", "187", "0", "3.5", "3", "?", "3", "0"]),
            row(&["41", "0", "2", "130", "204", "0", "2", "172", "0", "1.4", "1", "0", "3", "4"]),
            row(&["56", "1", "2", "120", "236", "0", "0", "178", "0", "0.8", "1", "0", "abc", "0"]),
            row(&["62", "0", "4", "140", "268", "0", "2", "160", "0", "3.6", "3", "2", "3"]),
            row(&["57", "0", "4", "120", "354", "0", "0", "163", "1", "0.6", "1", "0", " 3 ", "3"]),
        ]
    }

    #[test]
    fn test_label_collapse_for_all_severities() {
        assert_eq!(collapse_label(0.0), 0);
        for v in 1..=4 {
            assert_eq!(collapse_label(f64::from(v)), 1);
        }
    }

    #[test]
    fn test_cleaning_drops_unusable_rows() {
        let cleaned = clean_rows(sample_rows());
        let summary = cleaned.summary();
        assert_eq!(summary.raw_rows, 8);
        // missing marker, non-numeric field and short row are dropped
        assert_eq!(summary.kept_rows, 5);
        assert_eq!(summary.dropped_rows, 3);
        assert_eq!(cleaned.labels(), &[0, 1, 1, 1, 1]);
        assert!((cleaned.features()[4].thal - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cleaning_rejects_non_finite_values() {
        let cleaned = clean_rows(vec![row(&[
            "63", "1", "1", "145", "NaN", "1", "2", "150", "0", "2.3", "3", "0", "6", "0",
        ])]);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean_rows(sample_rows());
        let twice = clean_rows(once.to_rows());
        assert_eq!(once.features(), twice.features());
        assert_eq!(once.labels(), twice.labels());
        assert_eq!(twice.summary().dropped_rows, 0);
    }

    #[test]
    fn test_stratified_split_preserves_class_balance() {
        let labels: Vec<u8> = (0..100).map(|i| u8::from(i % 4 == 0)).collect();
        let split = stratified_split(&labels, 0.2, 42).expect("Should split");

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
        let test_pos = split.test.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(test_pos, 5);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_split_is_deterministic() {
        let labels: Vec<u8> = (0..37).map(|i| u8::from(i % 3 == 0)).collect();
        let a = stratified_split(&labels, 0.2, 42).expect("Should split");
        let b = stratified_split(&labels, 0.2, 42).expect("Should split");
        let c = stratified_split(&labels, 0.2, 7).expect("Should split");
        assert_eq!(a, b);
        assert_ne!(a.test, c.test);
        assert_eq!(a.test.len(), 8);
    }

    #[test]
    fn test_stratified_split_rejects_degenerate_input() {
        assert!(stratified_split(&[0, 0, 0, 1], 0.2, 42).is_err());
        assert!(stratified_split(&[0, 1, 0, 1], 0.0, 42).is_err());
        assert!(stratified_split(&[0, 1, 0, 1], 1.0, 42).is_err());
    }

    #[test]
    fn test_stratified_split_needs_a_test_row_per_class() {
        let err = stratified_split(&[0, 1, 0, 1, 0], 0.2, 42).expect_err("One test row");
        assert!(matches!(err, DatasetError::InvalidSplit(_)));

        let mut labels = vec![0u8; 95];
        labels.extend([1u8; 5]);
        let split = stratified_split(&labels, 0.015, 42).expect("Should split");
        assert_eq!(split.test.len(), 2);
        assert!(split.test.iter().any(|&i| labels[i] == 0));
        assert!(split.test.iter().any(|&i| labels[i] == 1));
        assert!(split.train.iter().any(|&i| labels[i] == 1));
    }
}
