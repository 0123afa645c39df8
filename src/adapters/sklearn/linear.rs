//! Linear (logistic regression) classifier.

use serde::{Deserialize, Serialize};

use super::{check_classes, check_finite, ArtifactError};

/// Logistic regression exported as coefficient rows.
///
/// Binary problems carry a single row: a positive decision value selects
/// `classes[1]`. Multiclass problems carry one row per class and select the
/// arg-max.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<i64>,
    /// Coefficients `[n_rows][n_features]`.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Check structural consistency after deserialization.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` on inconsistent shapes.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        check_classes("linear classifier", &self.classes)?;

        let expected_rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != expected_rows {
            return Err(ArtifactError::Invalid(format!(
                "linear classifier with {} classes needs {expected_rows} coefficient rows, got {}",
                self.classes.len(),
                self.coefficients.len()
            )));
        }
        if self.intercepts.len() != expected_rows {
            return Err(ArtifactError::Invalid(format!(
                "linear classifier needs {expected_rows} intercepts, got {}",
                self.intercepts.len()
            )));
        }

        let n = self.n_features();
        if n == 0 {
            return Err(ArtifactError::Invalid(
                "linear classifier has empty coefficient rows".into(),
            ));
        }
        for row in &self.coefficients {
            if row.len() != n {
                return Err(ArtifactError::Invalid(
                    "linear classifier coefficient rows differ in length".into(),
                ));
            }
            check_finite("coefficients", row)?;
        }
        check_finite("intercepts", &self.intercepts)
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// Raw decision values, one per coefficient row.
    ///
    /// Callers must have checked the input length.
    #[must_use]
    pub fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + intercept
            })
            .collect()
    }

    /// Class probabilities in `classes` order.
    #[must_use]
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let decision = self.decision_function(features);
        if let [d] = decision.as_slice() {
            let p = sigmoid(*d);
            return vec![1.0 - p, p];
        }
        softmax(&decision)
    }

    /// Index into `classes` of the predicted class.
    #[must_use]
    pub fn predict_index(&self, features: &[f64]) -> usize {
        let decision = self.decision_function(features);
        if let [d] = decision.as_slice() {
            return usize::from(*d > 0.0);
        }
        argmax(&decision)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> LinearClassifier {
        LinearClassifier {
            feature_names: None,
            classes: vec![0, 1],
            coefficients: vec![vec![1.0, -2.0]],
            intercepts: vec![0.5],
        }
    }

    #[test]
    fn test_binary_prediction() {
        let m = binary();
        assert!(m.validate().is_ok());
        // 1.0*1 - 2.0*0 + 0.5 = 1.5 > 0
        assert_eq!(m.predict_index(&[1.0, 0.0]), 1);
        // 0 - 2 + 0.5 < 0
        assert_eq!(m.predict_index(&[0.0, 1.0]), 0);
        // Exactly zero decision stays on the negative class.
        assert_eq!(m.predict_index(&[-0.5, 0.0]), 0);

        let proba = m.predict_proba(&[-0.5, 0.0]);
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_multiclass_prediction() {
        let m = LinearClassifier {
            feature_names: None,
            classes: vec![0, 1, 2],
            coefficients: vec![vec![1.0], vec![0.0], vec![-1.0]],
            intercepts: vec![0.0, 0.0, 0.0],
        };
        assert!(m.validate().is_ok());
        assert_eq!(m.predict_index(&[3.0]), 0);
        assert_eq!(m.predict_index(&[-3.0]), 2);

        let proba = m.predict_proba(&[0.0]);
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut m = binary();
        m.intercepts.push(1.0);
        assert!(m.validate().is_err());

        let mut m = binary();
        m.classes = vec![0, 1, 2];
        assert!(m.validate().is_err());

        let mut m = binary();
        m.classes = vec![1, 1];
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_argmax_first_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[2.0]), 0);
    }
}
