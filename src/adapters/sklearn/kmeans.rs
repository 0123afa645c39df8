//! K-means clusterer exported from the training pipeline.

use serde::{Deserialize, Serialize};

use super::{check_finite, ArtifactError};
use crate::domain::ModelError;
use crate::ports::Predictor;

/// Nearest-centroid assignment over fitted cluster centers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Cluster centers `[n_clusters][n_features]`.
    pub centroids: Vec<Vec<f64>>,
}

impl KMeans {
    /// Check structural consistency after deserialization.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if there are no centroids or their
    /// lengths differ.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.n_features();
        if n == 0 {
            return Err(ArtifactError::Invalid("k-means has no centroids".into()));
        }
        for (i, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != n {
                return Err(ArtifactError::Invalid(format!(
                    "centroid {i} has {} features, expected {n}",
                    centroid.len()
                )));
            }
            check_finite("centroid", centroid)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl Predictor for KMeans {
    fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        ModelError::check_input("k-means", self.n_features(), features)?;

        // Strict comparison keeps the lowest index on ties.
        let mut best: Option<(usize, f64)> = None;
        for (idx, centroid) in self.centroids.iter().enumerate() {
            let dist = squared_distance(features, centroid);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }

        best.map(|(idx, _)| idx as i64)
            .ok_or_else(|| ModelError::InvalidModel("k-means has no centroids".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> KMeans {
        KMeans {
            feature_names: None,
            centroids: vec![vec![0.0, 0.0], vec![2.0, 2.0], vec![-2.0, 2.0]],
        }
    }

    #[test]
    fn test_nearest_centroid() {
        let m = model();
        assert_eq!(m.predict(&[0.1, -0.3]).unwrap(), 0);
        assert_eq!(m.predict(&[1.8, 2.5]).unwrap(), 1);
        assert_eq!(m.predict(&[-3.0, 1.0]).unwrap(), 2);
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        // Equidistant from centroids 1 and 2.
        assert_eq!(model().predict(&[0.0, 2.0]).unwrap(), 1);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(model().predict(&[1.0]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(model().validate().is_ok());

        let ragged = KMeans {
            feature_names: None,
            centroids: vec![vec![0.0, 0.0], vec![1.0]],
        };
        assert!(ragged.validate().is_err());

        let empty = KMeans {
            feature_names: None,
            centroids: vec![],
        };
        assert!(empty.validate().is_err());
    }
}
