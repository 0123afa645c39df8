//! Predictor port: Traits for the fitted model stages.
//!
//! Every model stage takes a fixed-length feature slice. The classifier and
//! both clusterers reduce it to an integer code; the scaler maps it to a
//! vector of the same length.

use crate::domain::ModelError;

/// A fitted model that maps a feature vector to an integer code.
///
/// Implementations are immutable after loading and shared across requests.
pub trait Predictor: Send + Sync {
    /// Number of features `predict` expects.
    fn n_features(&self) -> usize;

    /// Predict the code for one sample.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if `features` has the wrong
    /// length, `ModelError::NonFinite` if it contains NaN or infinity.
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;
}

/// A fitted per-feature scaling transform.
pub trait FeatureScaler: Send + Sync {
    /// Number of features `transform` expects.
    fn n_features(&self) -> usize;

    /// Produce a scaled copy of one sample.
    ///
    /// # Errors
    /// Same conditions as [`Predictor::predict`].
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}
