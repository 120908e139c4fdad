//! Artifact port: Persistence of the trained scaler/classifier pair.

/// Trait for saving and loading trained artifacts.
///
/// The scaler and the classifier are always written and read together;
/// implementations must refuse to load a pair that was not saved together.
pub trait ArtifactStore: Send + Sync {
    /// The fitted model type persisted by this store.
    type Model;

    /// Error type for artifact operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the artifact pair, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if serialization or writing fails.
    fn save(&self, model: &Self::Model) -> Result<(), Self::Error>;

    /// Load and verify the artifact pair.
    ///
    /// # Errors
    /// Returns error if artifacts are missing, corrupt or inconsistent.
    fn load(&self) -> Result<Self::Model, Self::Error>;

    /// Check whether an artifact pair is present (without verifying it).
    fn has_artifacts(&self) -> bool;
}
