//! Filesystem artifact store: Implementation of ArtifactStore.
//!
//! A trained model is persisted as three JSON files in one directory:
//! - `scaler.json`: the fitted `StandardScaler`
//! - `heart_model.json`: the fitted `RandomForestClassifier`, which embeds
//!   the scaled training rows and is therefore written owner-only
//! - `manifest.json`: SHA-256 of both files, feature order, pipeline version
//!
//! The manifest binds the scaler and the forest together. Loading refuses a
//! pair that was not written by the same training run, a pair recorded with a
//! different feature order, or a pair from another pipeline version.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use aprender::preprocessing::StandardScaler;
use aprender::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::forest::ForestModel;
use crate::domain::{ForestParams, ModelError, FEATURE_NAMES, PIPELINE_VERSION};
use crate::ports::ArtifactStore;

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "heart_model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact persistence.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact missing: {}", .0.display())]
    Missing(PathBuf),

    #[error("Model artifact corrupt: {0}")]
    Corrupt(String),

    #[error("File hash mismatch for {0}: scaler and model were not saved together")]
    HashMismatch(String),

    #[error("Feature order mismatch: artifacts expect [{0}]")]
    FeatureOrder(String),

    #[error("Unsupported artifact version: {0}")]
    Version(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    pub pipeline_version: u32,
    pub feature_names: Vec<String>,
    pub params: ForestParams,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// File name -> lowercase hex SHA-256
    pub files: BTreeMap<String, String>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{b:02x}")).collect()
}

/// Artifact store rooted at a model directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_required(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.path(name);
        fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArtifactError::Missing(path),
            _ => ArtifactError::Io(e),
        })
    }

    /// Read and check `manifest.json` without loading the model files.
    ///
    /// # Errors
    /// Returns an error if the manifest is missing, unreadable, from another
    /// manifest or pipeline version, or records a different feature order.
    pub fn manifest(&self) -> Result<ModelManifest, ArtifactError> {
        let bytes = self.read_required(MANIFEST_FILE)?;
        let manifest: ModelManifest = serde_json::from_slice(&bytes)
            .map_err(|e| ArtifactError::Corrupt(format!("{MANIFEST_FILE}: {e}")))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::Version(format!(
                "manifest version {} (expected {MANIFEST_VERSION})",
                manifest.version
            )));
        }
        if manifest.pipeline_version != PIPELINE_VERSION {
            return Err(ArtifactError::Version(format!(
                "pipeline version {} (expected {PIPELINE_VERSION}); retrain the model",
                manifest.pipeline_version
            )));
        }
        if !manifest.feature_names.iter().eq(FEATURE_NAMES.iter()) {
            return Err(ArtifactError::FeatureOrder(manifest.feature_names.join(", ")));
        }
        Ok(manifest)
    }

    fn read_bound(&self, manifest: &ModelManifest, name: &str) -> Result<Vec<u8>, ArtifactError> {
        let expected = manifest.files.get(name).ok_or_else(|| {
            ArtifactError::Corrupt(format!("{MANIFEST_FILE} does not bind {name}"))
        })?;
        let bytes = self.read_required(name)?;
        if !sha256_hex(&bytes).eq_ignore_ascii_case(expected) {
            return Err(ArtifactError::HashMismatch(name.to_string()));
        }
        Ok(bytes)
    }
}

/// Write `bytes` to `path`, readable by the owner only on Unix.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let mut file = opts.open(path)?;
    // `mode` only applies on creation.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}

impl ArtifactStore for FsArtifactStore {
    type Model = ForestModel;
    type Error = ArtifactError;

    fn save(&self, model: &ForestModel) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir)?;

        let scaler = serde_json::to_vec(model.scaler())?;
        let forest = serde_json::to_vec(model.forest())?;

        let mut files = BTreeMap::new();
        files.insert(SCALER_FILE.to_string(), sha256_hex(&scaler));
        files.insert(MODEL_FILE.to_string(), sha256_hex(&forest));

        let manifest = ModelManifest {
            version: MANIFEST_VERSION,
            pipeline_version: PIPELINE_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            params: model.params(),
            created_at: chrono::Utc::now(),
            files,
        };

        fs::write(self.path(SCALER_FILE), &scaler)?;
        write_private(&self.path(MODEL_FILE), &forest)?;
        // Written last: a crash mid-save leaves a stale manifest that fails the hash check.
        fs::write(self.path(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;

        tracing::info!("Saved model artifacts to {}", self.dir.display());
        Ok(())
    }

    fn load(&self) -> Result<ForestModel, ArtifactError> {
        let manifest = self.manifest()?;

        let scaler_bytes = self.read_bound(&manifest, SCALER_FILE)?;
        let forest_bytes = self.read_bound(&manifest, MODEL_FILE)?;

        let scaler: StandardScaler = serde_json::from_slice(&scaler_bytes)
            .map_err(|e| ArtifactError::Corrupt(format!("{SCALER_FILE}: {e}")))?;
        let forest: RandomForestClassifier = serde_json::from_slice(&forest_bytes)
            .map_err(|e| ArtifactError::Corrupt(format!("{MODEL_FILE}: {e}")))?;

        let model = ForestModel::from_parts(scaler, forest, manifest.params)?;
        tracing::info!(
            "Loaded model artifacts from {} (trained {})",
            self.dir.display(),
            manifest.created_at.format("%Y-%m-%d %H:%M UTC")
        );
        Ok(model)
    }

    fn has_artifacts(&self) -> bool {
        [SCALER_FILE, MODEL_FILE, MANIFEST_FILE]
            .iter()
            .all(|name| self.path(name).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::forest::tests::synthetic_cohort;
    use crate::domain::AssessmentInput;
    use crate::ports::RiskClassifier;

    fn trained() -> ForestModel {
        let (records, labels) = synthetic_cohort(40);
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };
        ForestModel::fit(&records, &labels, params).expect("Should fit")
    }

    fn rewrite_manifest(store: &FsArtifactStore, edit: impl FnOnce(&mut ModelManifest)) {
        let path = store.path(MANIFEST_FILE);
        let mut manifest: ModelManifest =
            serde_json::from_slice(&fs::read(&path).expect("read")).expect("parse");
        edit(&mut manifest);
        fs::write(&path, serde_json::to_vec(&manifest).expect("encode")).expect("write");
    }

    #[test]
    fn test_save_then_load_predicts_identically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().join("model"));
        assert!(!store.has_artifacts());

        let model = trained();
        store.save(&model).expect("Should save");
        assert!(store.has_artifacts());

        let loaded = store.load().expect("Should load");
        let patient = AssessmentInput::sample().encode();
        assert_eq!(
            loaded.predict(&patient).expect("predict"),
            model.predict(&patient).expect("predict")
        );
        assert_eq!(loaded.params(), model.params());
    }

    #[cfg(unix)]
    #[test]
    fn test_forest_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());
        fs::write(store.path(MODEL_FILE), b"stale").expect("write");
        fs::set_permissions(store.path(MODEL_FILE), fs::Permissions::from_mode(0o644))
            .expect("chmod");

        store.save(&trained()).expect("Should save");
        let mode = fs::metadata(store.path(MODEL_FILE)).expect("stat").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(store.load().is_ok());
    }

    #[test]
    fn test_missing_artifacts_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());
        assert!(matches!(store.load(), Err(ArtifactError::Missing(_))));

        store.save(&trained()).expect("Should save");
        fs::remove_file(store.path(SCALER_FILE)).expect("remove");
        assert!(!store.has_artifacts());
        match store.load() {
            Err(ArtifactError::Missing(path)) => assert!(path.ends_with(SCALER_FILE)),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_pair_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());
        store.save(&trained()).expect("Should save");

        // Swap in a scaler from a different training run.
        let (records, labels) = synthetic_cohort(24);
        let other = ForestModel::fit(&records, &labels, ForestParams::default()).expect("fit");
        fs::write(
            store.path(SCALER_FILE),
            serde_json::to_vec(other.scaler()).expect("encode"),
        )
        .expect("write");

        assert!(matches!(store.load(), Err(ArtifactError::HashMismatch(name)) if name == SCALER_FILE));
    }

    #[test]
    fn test_feature_order_and_version_are_checked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());
        store.save(&trained()).expect("Should save");

        rewrite_manifest(&store, |m| m.feature_names.swap(0, 1));
        assert!(matches!(store.load(), Err(ArtifactError::FeatureOrder(_))));

        rewrite_manifest(&store, |m| {
            m.feature_names.swap(0, 1);
            m.pipeline_version = PIPELINE_VERSION + 1;
        });
        assert!(matches!(store.load(), Err(ArtifactError::Version(_))));
    }

    #[test]
    fn test_corrupt_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());
        store.save(&trained()).expect("Should save");
        fs::write(store.path(MANIFEST_FILE), b"{not json").expect("write");
        assert!(matches!(store.load(), Err(ArtifactError::Corrupt(_))));
    }
}
