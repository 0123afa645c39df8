//! Standard scaler exported from the training pipeline.

use serde::{Deserialize, Serialize};

use super::{check_finite, ArtifactError};
use crate::domain::ModelError;
use crate::ports::FeatureScaler;

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check structural consistency after deserialization.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` on empty or mismatched parameters.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.mean.is_empty() {
            return Err(ArtifactError::Invalid("scaler has no features".into()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        check_finite("scaler mean", &self.mean)?;
        check_finite("scaler scale", &self.scale)
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_input("scaler", self.mean.len(), features)?;

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // Constant columns are exported with a zero scale.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
