//! Detokenizer tunables.

/// Sample count a token's data centroid must exceed before its direction
/// classifier is trusted.
pub const DEFAULT_MIN_CLUSTER_SAMPLES: u64 = 20;

/// Decimal places kept in reconstructed coordinates (~0.1m).
pub const DEFAULT_PRECISION: u32 = 6;

/// Most decimal places worth keeping; an `f64` carries ~15-17 significant
/// digits.
pub const MAX_PRECISION: u32 = 15;

/// Configuration for a [`Detokenizer`](super::Detokenizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetokenizerConfig {
    /// Classifier refinement requires `current_count > min_cluster_samples`
    /// whenever a cluster stat exists for the token.
    pub min_cluster_samples: u64,
    /// Decimal places applied to output points.
    pub precision: u32,
}

impl Default for DetokenizerConfig {
    fn default() -> Self {
        Self {
            min_cluster_samples: DEFAULT_MIN_CLUSTER_SAMPLES,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl DetokenizerConfig {
    pub fn with_min_cluster_samples(mut self, samples: u64) -> Self {
        self.min_cluster_samples = samples;
        self
    }

    /// Output precision, capped at [`MAX_PRECISION`].
    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.precision = decimals.min(MAX_PRECISION);
        self
    }
}
