//! Direction-conditioned cluster classifiers.
//!
//! Each token with enough history has its observed points split into clusters
//! by approach bearing. The classifier picks a cluster from a bearing; the
//! cluster's mean is then used as the reconstructed point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// Maps a single feature (a bearing in degrees) to a cluster label.
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Label for `feature`, or `None` if the feature cannot be classified.
    fn predict(&self, feature: f64) -> Option<usize>;

    /// Number of labels this predictor can emit.
    fn label_count(&self) -> usize;
}

/// One-dimensional nearest-centre classifier.
///
/// Labels are indices into `centers`; prediction picks the centre with the
/// smallest absolute difference to the feature. Distances are linear, so 359°
/// and 1° are far apart, matching k-means fitted on raw bearings.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestCentroid {
    centers: Vec<f64>,
}

impl NearestCentroid {
    pub fn new(centers: Vec<f64>) -> Self {
        Self { centers }
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }
}

impl Predictor for NearestCentroid {
    fn predict(&self, feature: f64) -> Option<usize> {
        if !feature.is_finite() {
            return None;
        }

        // Strict `<` keeps the lowest label on ties
        let mut best: Option<(usize, f64)> = None;
        for (label, center) in self.centers.iter().enumerate() {
            let distance = (feature - center).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((label, distance)),
            }
        }
        best.map(|(label, _)| label)
    }

    fn label_count(&self) -> usize {
        self.centers.len()
    }
}

/// Mean of one observed cluster: `(x, y, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterMean {
    pub x: f64,
    pub y: f64,
    pub count: f64,
}

impl ClusterMean {
    pub fn new(x: f64, y: f64, count: f64) -> Self {
        Self { x, y, count }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Per-token classifier and the cluster means it selects between.
#[derive(Debug)]
pub struct ClassifierEntry {
    predictor: Box<dyn Predictor>,
    means: Vec<ClusterMean>,
}

impl ClassifierEntry {
    pub fn new(predictor: Box<dyn Predictor>, means: Vec<ClusterMean>) -> Self {
        Self { predictor, means }
    }

    /// Convenience constructor for a [`NearestCentroid`] classifier.
    pub fn nearest_centroid(centers: Vec<f64>, means: Vec<ClusterMean>) -> Self {
        Self::new(Box::new(NearestCentroid::new(centers)), means)
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn means(&self) -> &[ClusterMean] {
        &self.means
    }

    /// Mean of the cluster selected for `bearing`.
    ///
    /// `None` when the predictor declines the feature or returns a label with
    /// no matching mean.
    pub fn cluster_for(&self, bearing: f64) -> Option<&ClusterMean> {
        let label = self.predictor.predict(bearing)?;
        self.means.get(label)
    }
}
