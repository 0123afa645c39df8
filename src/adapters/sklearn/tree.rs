//! Decision tree classifier in sklearn's flat array layout.

use serde::{Deserialize, Serialize};

use super::linear::argmax;
use super::{check_classes, ArtifactError};

/// Child index marking a leaf node.
const TREE_LEAF: i64 = -1;

/// Fitted decision tree.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<i64>,
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights `[n_nodes][n_classes]`.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Check structural consistency after deserialization.
    ///
    /// Children must come after their parent, so traversal always
    /// terminates.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` on inconsistent arrays.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        check_classes("decision tree", &self.classes)?;

        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err(ArtifactError::Invalid("decision tree has no nodes".into()));
        }
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid(
                "decision tree declares zero features".into(),
            ));
        }
        if self.children_right.len() != n_nodes
            || self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err(ArtifactError::Invalid(
                "decision tree node arrays differ in length".into(),
            ));
        }

        for node in 0..n_nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(ArtifactError::Invalid(format!(
                        "decision tree node {node} has exactly one child"
                    )));
                }
                let weights = &self.value[node];
                if weights.len() != self.classes.len()
                    || weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(ArtifactError::Invalid(format!(
                        "decision tree leaf {node} has invalid class weights"
                    )));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n_nodes as i64 {
                    return Err(ArtifactError::Invalid(format!(
                        "decision tree node {node} has out-of-order child {child}"
                    )));
                }
            }
            if !(0..self.n_features as i64).contains(&self.feature[node]) {
                return Err(ArtifactError::Invalid(format!(
                    "decision tree node {node} splits on unknown feature {}",
                    self.feature[node]
                )));
            }
            if !self.threshold[node].is_finite() {
                return Err(ArtifactError::Invalid(format!(
                    "decision tree node {node} has a non-finite threshold"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn leaf(&self, features: &[f64]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let split = self.feature[node] as usize;
            node = if features[split] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Normalized class weights of the leaf reached by `features`.
    ///
    /// Callers must have checked the input length.
    #[must_use]
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let weights = &self.value[self.leaf(features)];
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total).collect()
    }

    /// Index into `classes` of the predicted class.
    #[must_use]
    pub fn predict_index(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root splits on feature 1 at 0.5; right child splits on feature 0.
    fn stump() -> DecisionTree {
        DecisionTree {
            feature_names: None,
            classes: vec![0, 1],
            n_features: 2,
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![1, -2, 0, -2, -2],
            threshold: vec![0.5, -2.0, 2.0, -2.0, -2.0],
            value: vec![
                vec![10.0, 10.0],
                vec![8.0, 2.0],
                vec![2.0, 8.0],
                vec![1.0, 1.0],
                vec![0.0, 6.0],
            ],
        }
    }

    #[test]
    fn test_traversal() {
        let tree = stump();
        assert!(tree.validate().is_ok());

        assert_eq!(tree.predict_proba(&[9.0, 0.5]), vec![0.8, 0.2]);
        assert_eq!(tree.predict_index(&[9.0, 0.0]), 0);
        assert_eq!(tree.predict_index(&[3.0, 1.0]), 1);
        // Tied leaf weights resolve to the first class.
        assert_eq!(tree.predict_index(&[1.0, 1.0]), 0);
    }

    #[test]
    fn test_validate_rejects_cycles() {
        let mut tree = stump();
        tree.children_left[2] = 1;
        assert!(tree.validate().is_err());

        let mut tree = stump();
        tree.children_right[0] = 0;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_split_feature() {
        let mut tree = stump();
        tree.feature[0] = 5;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_leaf() {
        let mut tree = stump();
        tree.value[4] = vec![0.0, 0.0];
        assert!(tree.validate().is_err());
    }
}
