//! Prediction service: Runs the screening pipeline for one submission.
//!
//! Pipeline:
//! - Scale the feature vector
//! - Classify the unscaled vector
//! - If presence is indicated, cluster the scaled vector twice (associated
//!   disease, severity) and map both ids to labels

use std::path::Path;
use std::sync::Arc;

use crate::adapters::sklearn::{ClassifierModel, KMeans, SklearnModels, StandardScaler};
use crate::domain::{
    AssociatedDisease, FeatureError, FeatureVector, ModelError, Prediction, SeverityLevel,
    PRESENT_CODE,
};
use crate::ports::{FeatureScaler, Predictor};

/// Errors surfaced to the caller of [`PredictionService`].
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("severity model returned unknown code {0}")]
    UnknownSeverity(i64),
}

impl PredictError {
    /// Whether the request itself was incomplete (no model was invoked).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Feature(FeatureError::Missing(_)))
    }
}

/// Service running the screening models.
///
/// Holds the fitted stages behind `Arc` so one instance is shared by every
/// request. Nothing here is mutated after construction.
pub struct PredictionService<C, K, S>
where
    C: Predictor,
    K: Predictor,
    S: FeatureScaler,
{
    classifier: Arc<C>,
    disease_clusters: Arc<K>,
    severity_clusters: Arc<K>,
    scaler: Arc<S>,
}

/// Service over the exported scikit-learn models.
pub type SklearnPredictionService = PredictionService<ClassifierModel, KMeans, StandardScaler>;

impl SklearnPredictionService {
    /// Load the artifacts in `model_dir` and build the service.
    ///
    /// # Errors
    /// Returns `EndoscreenError::Artifact` if any artifact is missing,
    /// malformed, or fails manifest verification.
    pub fn load(model_dir: &Path, require_manifest: bool) -> crate::Result<Self> {
        let models = SklearnModels::load(model_dir, require_manifest)?;
        Ok(Self::from_models(models))
    }

    /// Build the service from a loaded artifact bundle.
    #[must_use]
    pub fn from_models(models: SklearnModels) -> Self {
        Self::new(
            Arc::new(models.classifier),
            Arc::new(models.disease_clusters),
            Arc::new(models.severity_clusters),
            Arc::new(models.scaler),
        )
    }
}

impl<C, K, S> PredictionService<C, K, S>
where
    C: Predictor,
    K: Predictor,
    S: FeatureScaler,
{
    /// Create a new prediction service.
    pub fn new(
        classifier: Arc<C>,
        disease_clusters: Arc<K>,
        severity_clusters: Arc<K>,
        scaler: Arc<S>,
    ) -> Self {
        Self {
            classifier,
            disease_clusters,
            severity_clusters,
            scaler,
        }
    }

    /// Assemble the feature vector from form pairs and run the pipeline.
    ///
    /// # Errors
    /// Returns `PredictError::Feature` before any model runs if a feature
    /// is missing or unparsable; otherwise see [`Self::predict`].
    pub fn predict_pairs(&self, pairs: &[(String, String)]) -> Result<Prediction, PredictError> {
        let features = FeatureVector::from_pairs(pairs)?;
        self.predict(&features)
    }

    /// Run the screening pipeline on one feature vector.
    ///
    /// The classifier receives the unscaled vector; only the clustering
    /// stages see the scaled one.
    ///
    /// # Errors
    /// Returns `PredictError::Model` if a stage rejects its input and
    /// `PredictError::UnknownSeverity` if the severity cluster id has no
    /// label.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictError> {
        tracing::debug!("Scaling feature vector");
        let scaled = self.scaler.transform(features.as_slice())?;

        tracing::debug!("Running classifier");
        let code = self.classifier.predict(features.as_slice())?;

        if code != PRESENT_CODE {
            tracing::info!("Screening complete: classifier={code}, presence not indicated");
            return Ok(Prediction::absent(code));
        }

        tracing::debug!("Running disease clustering");
        let cluster = self.disease_clusters.predict(&scaled)?;
        let disease = AssociatedDisease::from_cluster(cluster);
        if disease.is_none() {
            tracing::warn!("Disease cluster {cluster} has no mapped condition");
        }

        tracing::debug!("Running severity clustering");
        let severity_code = self.severity_clusters.predict(&scaled)?;
        let severity = SeverityLevel::from_code(severity_code)
            .ok_or(PredictError::UnknownSeverity(severity_code))?;

        tracing::info!(
            "Screening complete: classifier={code}, disease_cluster={cluster}, severity={severity}"
        );
        Ok(Prediction::present(disease, severity))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::adapters::sklearn::test_support::{
        diagonal_clusters, identity_scaler, sum_classifier,
    };
    use crate::domain::{FEATURE_COUNT, FEATURE_NAMES, UNKNOWN_DISEASE};

    fn form(value: &str) -> Vec<(String, String)> {
        FEATURE_NAMES
            .iter()
            .map(|name| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_absent_ignores_cluster_outputs() {
        for code in [0, 2, 3, 4] {
            let service = stub_service(code, 3, 4);
            let prediction = service.predict_pairs(&form("1")).expect("Should predict");

            assert_eq!(prediction.classifier_code, code);
            assert_eq!(prediction.recommended_diseases, vec![UNKNOWN_DISEASE]);
            assert_eq!(prediction.severity, SeverityLevel::NoEndometriosis);
        }
    }

    #[test]
    fn test_clusters_not_run_when_absent() {
        let disease = FixedPredictor::new(1);
        let severity = FixedPredictor::new(1);
        let service = PredictionService::new(
            FixedPredictor::new(0),
            disease.clone(),
            severity.clone(),
            Arc::new(DoublingScaler),
        );

        service.predict_pairs(&form("0")).expect("Should predict");
        assert_eq!(disease.calls(), 0);
        assert_eq!(severity.calls(), 0);
    }

    #[test]
    fn test_present_maps_cluster_ids() {
        let service = stub_service(1, 2, 3);
        let prediction = service.predict_pairs(&form("1")).expect("Should predict");

        assert!(prediction.is_present());
        assert_eq!(
            prediction.recommended_diseases,
            vec!["Pelvic Inflammatory Disease (PID)"]
        );
        assert_eq!(prediction.severity, SeverityLevel::Moderate);
    }

    #[test]
    fn test_unmapped_disease_cluster_gives_empty_list() {
        let service = stub_service(1, 9, 1);
        let prediction = service.predict_pairs(&form("1")).expect("Should predict");

        assert!(prediction.recommended_diseases.is_empty());
        assert_eq!(prediction.severity, SeverityLevel::Minimal);
    }

    #[test]
    fn test_unmapped_severity_code_is_an_error() {
        let service = stub_service(1, 0, 7);
        let err = service.predict_pairs(&form("1")).expect_err("Must fail");

        assert!(matches!(err, PredictError::UnknownSeverity(7)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_missing_feature_skips_models() {
        let classifier = FixedPredictor::new(1);
        let service = PredictionService::new(
            classifier.clone(),
            FixedPredictor::new(0),
            FixedPredictor::new(0),
            Arc::new(DoublingScaler),
        );

        let mut pairs = form("1");
        pairs.retain(|(name, _)| name != "Pelvic pain");
        let err = service.predict_pairs(&pairs).expect_err("Must fail");

        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Missing input for feature: Pelvic pain");
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn test_parse_error_is_not_client_error() {
        let service = stub_service(1, 0, 1);
        let mut pairs = form("1");
        pairs[3].1 = "abc".to_string();

        let err = service.predict_pairs(&pairs).expect_err("Must fail");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_non_finite_input_is_model_error() {
        let service = stub_service(1, 0, 1);
        let err = service.predict_pairs(&form("inf")).expect_err("Must fail");
        assert!(matches!(err, PredictError::Model(ModelError::NonFinite { .. })));
    }

    #[test]
    fn test_classifier_sees_unscaled_clusters_see_scaled() {
        // Classifier votes present above a raw sum of 15; with 22 features at
        // 1.0 the raw sum is 22. Scaled (doubled) values sit on centroid 2.
        let service = PredictionService::new(
            Arc::new(sum_classifier(15.0)),
            Arc::new(diagonal_clusters(6)),
            Arc::new(diagonal_clusters(5)),
            Arc::new(DoublingScaler),
        );

        let features = FeatureVector::new([1.0; FEATURE_COUNT]);
        let prediction = service.predict(&features).expect("Should predict");
        assert_eq!(prediction.classifier_code, 1);
        assert_eq!(prediction.recommended_diseases, vec!["Pelvic Inflammatory Disease (PID)"]);
        assert_eq!(prediction.severity, SeverityLevel::Mild);

        // Raw sum 11 stays below the threshold even though scaled sum is 22.
        let features = FeatureVector::new([0.5; FEATURE_COUNT]);
        let prediction = service.predict(&features).expect("Should predict");
        assert_eq!(prediction.classifier_code, 0);
    }

    #[test]
    fn test_idempotent() {
        let service = SklearnPredictionService::new(
            Arc::new(sum_classifier(5.0)),
            Arc::new(diagonal_clusters(6)),
            Arc::new(diagonal_clusters(5)),
            Arc::new(identity_scaler()),
        );

        let pairs = form("0.75");
        let first = service.predict_pairs(&pairs).expect("Should predict");
        let second = service.predict_pairs(&pairs).expect("Should predict");
        assert_eq!(first, second);
    }
}
