//! Errors raised by model stages at inference time.

/// Error type for scaler/classifier/clusterer evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{model} expects {expected} features, got {got}")]
    DimensionMismatch {
        model: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Input contains NaN or infinity (feature index {index})")]
    NonFinite { index: usize },

    #[error("Invalid model state: {0}")]
    InvalidModel(String),
}

impl ModelError {
    /// Reject inputs of the wrong length or containing non-finite values.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check_input(
        model: &'static str,
        expected: usize,
        features: &[f64],
    ) -> Result<(), Self> {
        if features.len() != expected {
            return Err(Self::DimensionMismatch {
                model,
                expected,
                got: features.len(),
            });
        }
        match features.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(Self::NonFinite { index }),
            None => Ok(()),
        }
    }
}
