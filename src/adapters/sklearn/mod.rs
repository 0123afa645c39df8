//! Scikit-learn export adapter: Implementation of the model ports.
//!
//! The offline training pipeline exports every fitted estimator as JSON
//! (coefficients, tree arrays, centroids, scaler statistics). This module
//! loads those exports once at startup and evaluates them natively.
//!
//! # Artifacts
//!
//! | file                   | model                          |
//! |------------------------|--------------------------------|
//! | `stacked_model.json`   | [`ClassifierModel`]            |
//! | `kmeans_disease.json`  | [`KMeans`] over disease groups |
//! | `kmeans_severity.json` | [`KMeans`] over severity codes |
//! | `scaler.json`          | [`StandardScaler`]             |
//!
//! An optional `manifest.json` binds the files by SHA-256 (see
//! [`ModelManifest`]).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::domain::FEATURE_NAMES;
use crate::ports::{FeatureScaler, Predictor};

mod classifier;
mod kmeans;
mod linear;
mod manifest;
mod scaler;
mod tree;

pub use classifier::{BaseEstimator, ClassifierModel, StackingClassifier};
pub use kmeans::KMeans;
pub use linear::LinearClassifier;
pub use manifest::{sha256_hex, ModelManifest, MANIFEST_FILE, MANIFEST_VERSION};
pub use scaler::StandardScaler;
pub use tree::DecisionTree;

pub const CLASSIFIER_FILE: &str = "stacked_model.json";
pub const DISEASE_CLUSTERS_FILE: &str = "kmeans_disease.json";
pub const SEVERITY_CLUSTERS_FILE: &str = "kmeans_severity.json";
pub const SCALER_FILE: &str = "scaler.json";

/// Every artifact the server needs, in load order.
pub const ARTIFACT_FILES: [&str; 4] = [
    CLASSIFIER_FILE,
    DISEASE_CLUSTERS_FILE,
    SEVERITY_CLUSTERS_FILE,
    SCALER_FILE,
];

/// Error type for loading model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Artifact integrity check failed: {0}")]
    Integrity(String),

    #[error("manifest.json required but not found in {0:?}")]
    MissingManifest(PathBuf),
}

pub(crate) fn check_finite(what: &str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ArtifactError::Invalid(format!(
            "{what} contains NaN or infinity"
        )))
    }
}

pub(crate) fn check_classes(what: &str, classes: &[i64]) -> Result<(), ArtifactError> {
    if classes.len() < 2 {
        return Err(ArtifactError::Invalid(format!(
            "{what} needs at least two classes, got {}",
            classes.len()
        )));
    }
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != classes.len() {
        return Err(ArtifactError::Invalid(format!(
            "{what} has duplicate class labels"
        )));
    }
    Ok(())
}

/// Reject artifacts trained on a different column order.
fn check_feature_names(file: &str, names: Option<&[String]>) -> Result<(), ArtifactError> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != FEATURE_NAMES.len() {
        return Err(ArtifactError::Invalid(format!(
            "{file} was fitted on {} features, expected {}",
            names.len(),
            FEATURE_NAMES.len()
        )));
    }
    if let Some((idx, (got, expected))) = names
        .iter()
        .zip(FEATURE_NAMES.iter())
        .enumerate()
        .find(|(_, (got, expected))| got.as_str() != **expected)
    {
        return Err(ArtifactError::Invalid(format!(
            "{file} feature {idx} is {got:?}, expected {expected:?}"
        )));
    }
    Ok(())
}

fn check_width(file: &str, n_features: usize) -> Result<(), ArtifactError> {
    if n_features != FEATURE_NAMES.len() {
        return Err(ArtifactError::Invalid(format!(
            "{file} expects {n_features} features, expected {}",
            FEATURE_NAMES.len()
        )));
    }
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(model_dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let path = model_dir.join(file);
    let content = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Json { path, source })
}

/// The four fitted models, loaded together.
#[derive(Debug, Clone)]
pub struct SklearnModels {
    pub classifier: ClassifierModel,
    pub disease_clusters: KMeans,
    pub severity_clusters: KMeans,
    pub scaler: StandardScaler,
}

impl SklearnModels {
    /// Load and validate every artifact in `model_dir`.
    ///
    /// The manifest is checked first so no unverified file is parsed.
    ///
    /// # Errors
    /// Returns error if a file is missing, malformed, fails the manifest
    /// check, or was fitted on a different feature layout.
    pub fn load(model_dir: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        ModelManifest::verify(model_dir, &ARTIFACT_FILES, require_manifest)?;
        Self::load_unverified(model_dir)
    }

    /// Parse and validate every artifact in `model_dir`, ignoring any
    /// `manifest.json`.
    ///
    /// Used when (re)building the manifest itself.
    ///
    /// # Errors
    /// Returns error if a file is missing, malformed, or was fitted on a
    /// different feature layout.
    pub fn load_unverified(model_dir: &Path) -> Result<Self, ArtifactError> {
        let classifier: ClassifierModel = read_artifact(model_dir, CLASSIFIER_FILE)?;
        classifier.validate()?;
        check_feature_names(CLASSIFIER_FILE, classifier.feature_names())?;
        check_width(CLASSIFIER_FILE, Predictor::n_features(&classifier))?;

        let disease_clusters = Self::load_clusters(model_dir, DISEASE_CLUSTERS_FILE)?;
        let severity_clusters = Self::load_clusters(model_dir, SEVERITY_CLUSTERS_FILE)?;

        let scaler: StandardScaler = read_artifact(model_dir, SCALER_FILE)?;
        scaler.validate()?;
        check_feature_names(SCALER_FILE, scaler.feature_names.as_deref())?;
        check_width(SCALER_FILE, FeatureScaler::n_features(&scaler))?;

        tracing::info!(
            "Loaded models from {:?} (classifier={}, classes={:?}, disease_clusters={}, severity_clusters={})",
            model_dir,
            classifier.kind(),
            classifier.classes(),
            disease_clusters.n_clusters(),
            severity_clusters.n_clusters()
        );

        Ok(Self {
            classifier,
            disease_clusters,
            severity_clusters,
            scaler,
        })
    }

    fn load_clusters(model_dir: &Path, file: &str) -> Result<KMeans, ArtifactError> {
        let clusters: KMeans = read_artifact(model_dir, file)?;
        clusters.validate()?;
        check_feature_names(file, clusters.feature_names.as_deref())?;
        check_width(file, clusters.n_features())?;
        Ok(clusters)
    }
}
