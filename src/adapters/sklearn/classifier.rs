//! Classifier artifact: linear, tree, or a stack of both.
//!
//! The stacked model feeds each base estimator's class probabilities to a
//! final logistic regression. For two-class problems only the positive-class
//! column is kept per estimator, matching how the stack was trained.

use serde::{Deserialize, Serialize};

use super::linear::LinearClassifier;
use super::tree::DecisionTree;
use super::{check_classes, ArtifactError};
use crate::domain::ModelError;
use crate::ports::Predictor;

/// Estimator usable as a stack member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseEstimator {
    Linear(LinearClassifier),
    Tree(DecisionTree),
}

impl BaseEstimator {
    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::Tree(m) => m.validate(),
        }
    }

    fn classes(&self) -> &[i64] {
        match self {
            Self::Linear(m) => &m.classes,
            Self::Tree(m) => &m.classes,
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::Linear(m) => m.n_features(),
            Self::Tree(m) => m.n_features(),
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        match self {
            Self::Linear(m) => m.predict_proba(features),
            Self::Tree(m) => m.predict_proba(features),
        }
    }
}

/// Stacked ensemble with a logistic regression on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackingClassifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<i64>,
    pub estimators: Vec<BaseEstimator>,
    /// Trained on encoded labels: its classes index into `classes`.
    pub final_estimator: LinearClassifier,
    /// Append the raw features to the meta features.
    #[serde(default)]
    pub passthrough: bool,
}

impl StackingClassifier {
    /// Check structural consistency after deserialization.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if members disagree on classes or
    /// feature counts, or the final estimator has the wrong input width.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        check_classes("stacking classifier", &self.classes)?;

        if self.estimators.is_empty() {
            return Err(ArtifactError::Invalid(
                "stacking classifier has no base estimators".into(),
            ));
        }

        let n = self.n_features();
        for (i, estimator) in self.estimators.iter().enumerate() {
            estimator.validate()?;
            if estimator.classes().len() != self.classes.len() {
                return Err(ArtifactError::Invalid(format!(
                    "base estimator {i} has {} classes, stack has {}",
                    estimator.classes().len(),
                    self.classes.len()
                )));
            }
            if estimator.n_features() != n {
                return Err(ArtifactError::Invalid(format!(
                    "base estimator {i} expects {} features, estimator 0 expects {n}",
                    estimator.n_features()
                )));
            }
        }

        self.final_estimator.validate()?;
        if self.final_estimator.classes.len() != self.classes.len() {
            return Err(ArtifactError::Invalid(
                "final estimator class count differs from stack".into(),
            ));
        }
        if self.final_estimator.n_features() != self.meta_width() {
            return Err(ArtifactError::Invalid(format!(
                "final estimator expects {} inputs, stack produces {}",
                self.final_estimator.n_features(),
                self.meta_width()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.estimators.first().map_or(0, BaseEstimator::n_features)
    }

    fn columns_per_estimator(&self) -> usize {
        if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        }
    }

    fn meta_width(&self) -> usize {
        let passthrough = if self.passthrough { self.n_features() } else { 0 };
        self.estimators.len() * self.columns_per_estimator() + passthrough
    }

    fn meta_features(&self, features: &[f64]) -> Vec<f64> {
        let skip = usize::from(self.classes.len() == 2);
        let mut meta = Vec::with_capacity(self.meta_width());
        for estimator in &self.estimators {
            meta.extend(estimator.predict_proba(features).into_iter().skip(skip));
        }
        if self.passthrough {
            meta.extend_from_slice(features);
        }
        meta
    }

    /// Index into `classes` of the predicted class.
    #[must_use]
    pub fn predict_index(&self, features: &[f64]) -> usize {
        self.final_estimator
            .predict_index(&self.meta_features(features))
    }
}

/// The primary classifier artifact (`stacked_model.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    Linear(LinearClassifier),
    Tree(DecisionTree),
    Stacking(StackingClassifier),
}

impl ClassifierModel {
    /// Check structural consistency after deserialization.
    ///
    /// # Errors
    /// Propagates the wrapped model's validation error.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::Tree(m) => m.validate(),
            Self::Stacking(m) => m.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Tree(_) => "tree",
            Self::Stacking(_) => "stacking",
        }
    }

    #[must_use]
    pub fn classes(&self) -> &[i64] {
        match self {
            Self::Linear(m) => &m.classes,
            Self::Tree(m) => &m.classes,
            Self::Stacking(m) => &m.classes,
        }
    }

    #[must_use]
    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Linear(m) => m.feature_names.as_deref(),
            Self::Tree(m) => m.feature_names.as_deref(),
            Self::Stacking(m) => m.feature_names.as_deref(),
        }
    }
}

impl Predictor for ClassifierModel {
    fn n_features(&self) -> usize {
        match self {
            Self::Linear(m) => m.n_features(),
            Self::Tree(m) => m.n_features(),
            Self::Stacking(m) => m.n_features(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        ModelError::check_input("classifier", self.n_features(), features)?;

        let idx = match self {
            Self::Linear(m) => m.predict_index(features),
            Self::Tree(m) => m.predict_index(features),
            Self::Stacking(m) => m.predict_index(features),
        };

        self.classes().get(idx).copied().ok_or_else(|| {
            ModelError::InvalidModel(format!("predicted class index {idx} out of range"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_linear() -> LinearClassifier {
        LinearClassifier {
            feature_names: None,
            classes: vec![0, 1],
            coefficients: vec![vec![4.0, 0.0]],
            intercepts: vec![-2.0],
        }
    }

    fn base_tree() -> DecisionTree {
        DecisionTree {
            feature_names: None,
            classes: vec![0, 1],
            n_features: 2,
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![1, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], vec![4.0, 1.0], vec![1.0, 4.0]],
        }
    }

    fn stack(passthrough: bool) -> StackingClassifier {
        let width = if passthrough { 4 } else { 2 };
        let mut coefficients = vec![3.0, 3.0];
        coefficients.resize(width, 0.0);
        StackingClassifier {
            feature_names: None,
            classes: vec![0, 1],
            estimators: vec![
                BaseEstimator::Linear(base_linear()),
                BaseEstimator::Tree(base_tree()),
            ],
            final_estimator: LinearClassifier {
                feature_names: None,
                classes: vec![0, 1],
                coefficients: vec![coefficients],
                intercepts: vec![-3.0],
            },
            passthrough,
        }
    }

    #[test]
    fn test_stacking_prediction() {
        let model = ClassifierModel::Stacking(stack(false));
        assert!(model.validate().is_ok());
        assert_eq!(model.n_features(), 2);

        // Both members favor class 1: 3*0.88 + 3*0.8 - 3 > 0.
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 1);
        // Both members favor class 0: 3*0.12 + 3*0.2 - 3 < 0.
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_passthrough_width_is_validated() {
        assert!(stack(true).validate().is_ok());

        let mut bad = stack(true);
        bad.passthrough = false;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_member_feature_mismatch() {
        let mut bad = stack(false);
        if let BaseEstimator::Tree(tree) = &mut bad.estimators[1] {
            tree.n_features = 3;
        }
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_predict_returns_class_label_not_index() {
        let mut linear = base_linear();
        linear.classes = vec![0, 3];
        let model = ClassifierModel::Linear(linear);
        assert!(model.validate().is_ok());
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 3);
    }

    #[test]
    fn test_deserialize_tagged_artifact() {
        let json = serde_json::json!({
            "kind": "stacking",
            "classes": [0, 1],
            "estimators": [
                {"kind": "linear", "classes": [0, 1], "coefficients": [[4.0, 0.0]], "intercepts": [-2.0]}
            ],
            "final_estimator": {"classes": [0, 1], "coefficients": [[1.0]], "intercepts": [0.0]}
        });

        let model: ClassifierModel = serde_json::from_value(json).expect("Should deserialize");
        assert_eq!(model.kind(), "stacking");
        assert!(model.validate().is_ok());
        assert!(model.feature_names().is_none());
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let model = ClassifierModel::Linear(base_linear());
        assert_eq!(
            model.predict(&[f64::NAN, 0.0]),
            Err(ModelError::NonFinite { index: 0 })
        );
    }
}
