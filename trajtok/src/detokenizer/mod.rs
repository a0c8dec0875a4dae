//! Trajectory detokenization.
//!
//! Reconstructs coordinates from a token sequence. Each valid token resolves
//! through a chain of tiers:
//!
//! ```text
//!   anchor:  DataCentroid ──(no stat)──► HexCentroid
//!               │                            │
//!               └──────────────┬─────────────┘
//!                              ▼
//!   refine:  ClusterCentroid (bearing previous → anchor)
//!               │
//!               └──(no classifier / no previous point / too few samples)──► anchor
//! ```
//!
//! The refinement depends on the previously reconstructed point, so a
//! sequence is processed as a left fold carrying `Option<Point>`. Invalid
//! tokens are skipped without touching that state. Sequences are independent
//! of each other, so [`Detokenizer::detokenize_batch`] runs them in parallel.

mod config;
mod tier;

pub use config::{
    DetokenizerConfig, DEFAULT_MIN_CLUSTER_SAMPLES, DEFAULT_PRECISION, MAX_PRECISION,
};
pub use tier::{Detokenized, Tier, TierCounts};

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::geo::{bearing_between, Point};
use crate::grid::{GridIndex, H3Grid, Token};
use crate::model::{ClusterMean, ClusterStat, ModelStore};

/// A single reconstructed point, before output rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub point: Point,
    pub tier: Tier,
}

/// Maps token sequences back to coordinates using a shared [`ModelStore`].
#[derive(Debug, Clone)]
pub struct Detokenizer<G = H3Grid> {
    grid: G,
    store: Arc<ModelStore>,
    config: DetokenizerConfig,
}

impl<G: GridIndex> Detokenizer<G> {
    /// Create a detokenizer with default configuration.
    pub fn new(grid: G, store: Arc<ModelStore>) -> Self {
        Self::with_config(grid, store, DetokenizerConfig::default())
    }

    pub fn with_config(grid: G, store: Arc<ModelStore>, config: DetokenizerConfig) -> Self {
        Self {
            grid,
            store,
            config,
        }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn config(&self) -> &DetokenizerConfig {
        &self.config
    }

    /// Reconstruct one token given the previous reconstructed point.
    ///
    /// Returns `None` for structurally invalid tokens. The returned point is
    /// not rounded.
    pub fn resolve(&self, token: &Token, previous: Option<Point>) -> Option<Resolved> {
        if !self.grid.is_valid(token) {
            return None;
        }

        let anchor = Tier::ANCHORS.iter().find_map(|&tier| {
            self.anchor(tier, token)
                .map(|point| Resolved { point, tier })
        })?;

        let refined = Tier::REFINEMENTS.iter().find_map(|&tier| {
            self.refine(tier, token, anchor.point, previous)
                .map(|point| Resolved { point, tier })
        });

        Some(refined.unwrap_or(anchor))
    }

    /// Reconstruct a token sequence.
    ///
    /// Output points are rounded to the configured precision; the unrounded
    /// point is what conditions the next token.
    pub fn detokenize(&self, tokens: &[Token]) -> Detokenized {
        let precision = self.config.precision;

        let (_, result) = tokens.iter().fold(
            (None, Detokenized::default()),
            |(previous, mut out), token| match self.resolve(token, previous) {
                Some(resolved) => {
                    out.tiers.record(resolved.tier);
                    out.points.push(resolved.point.rounded(precision));
                    (Some(resolved.point), out)
                }
                None => {
                    debug!(token = %token, "Dropping invalid token");
                    out.dropped += 1;
                    (previous, out)
                }
            },
        );

        if result.dropped > 0 {
            info!(
                dropped = result.dropped,
                total = tokens.len(),
                "Dropped invalid tokens during detokenization"
            );
        }

        result
    }

    /// Reconstruct many sequences in parallel, preserving order.
    pub fn detokenize_batch(&self, sequences: &[Vec<Token>]) -> Vec<Detokenized> {
        sequences
            .par_iter()
            .map(|tokens| self.detokenize(tokens))
            .collect()
    }

    fn anchor(&self, tier: Tier, token: &Token) -> Option<Point> {
        match tier {
            Tier::DataCentroid => self.store.lookup_stat(token).map(ClusterStat::point),
            Tier::HexCentroid => self.grid.token_to_centroid(token),
            Tier::ClusterCentroid => None,
        }
    }

    fn refine(
        &self,
        tier: Tier,
        token: &Token,
        anchor: Point,
        previous: Option<Point>,
    ) -> Option<Point> {
        match tier {
            Tier::ClusterCentroid => self.cluster_centroid(token, anchor, previous?),
            Tier::DataCentroid | Tier::HexCentroid => None,
        }
    }

    fn cluster_centroid(&self, token: &Token, anchor: Point, previous: Point) -> Option<Point> {
        let classifier = self.store.lookup_classifier(token)?;

        if let Some(stat) = self.store.lookup_stat(token) {
            if stat.current_count <= self.config.min_cluster_samples {
                return None;
            }
        }

        let angle = bearing_between(previous, anchor);
        classifier.cluster_for(angle).map(ClusterMean::point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierEntry, ClusterMean, ClusterStat};
    use std::collections::HashMap;

    const RES: u8 = 9;

    // Three cells on an east-west line through San Francisco
    const WEST: (f64, f64) = (37.7749, -122.45);
    const MIDDLE: (f64, f64) = (37.7749, -122.40);
    const EAST: (f64, f64) = (37.7749, -122.35);

    const EASTBOUND_MEAN: Point = Point::new(-122.401, 37.7751);
    const WESTBOUND_MEAN: Point = Point::new(-122.399, 37.7747);

    fn cell((lat, lon): (f64, f64)) -> Token {
        H3Grid::new().point_to_token(lat, lon, RES).unwrap()
    }

    fn hex_centroid(token: &Token) -> Point {
        H3Grid::new().token_to_centroid(token).unwrap()
    }

    fn direction_classifier() -> ClassifierEntry {
        ClassifierEntry::nearest_centroid(
            vec![90.0, 270.0],
            vec![
                ClusterMean::new(EASTBOUND_MEAN.x, EASTBOUND_MEAN.y, 15.0),
                ClusterMean::new(WESTBOUND_MEAN.x, WESTBOUND_MEAN.y, 12.0),
            ],
        )
    }

    /// Store with a classifier on MIDDLE and, optionally, a stat with `count`.
    fn middle_store(count: Option<u64>) -> Arc<ModelStore> {
        let mut stats = HashMap::new();
        if let Some(count) = count {
            stats.insert(cell(MIDDLE), ClusterStat::new(-122.4002, 37.7749, count));
        }
        let mut classifiers = HashMap::new();
        classifiers.insert(cell(MIDDLE), direction_classifier());
        Arc::new(ModelStore::from_parts(stats, classifiers))
    }

    fn detokenizer(store: Arc<ModelStore>) -> Detokenizer {
        Detokenizer::new(H3Grid::new(), store)
    }

    #[test]
    fn test_unknown_token_uses_hex_centroid() {
        let d = detokenizer(Arc::new(ModelStore::empty()));
        let token = cell(WEST);

        let resolved = d.resolve(&token, None).unwrap();
        assert_eq!(resolved.tier, Tier::HexCentroid);
        assert_eq!(resolved.point, hex_centroid(&token));

        // A previous point changes nothing without model data
        let resolved = d.resolve(&token, Some(Point::new(0.0, 0.0))).unwrap();
        assert_eq!(resolved.point, hex_centroid(&token));
    }

    #[test]
    fn test_stat_uses_data_centroid() {
        let token = cell(WEST);
        let mut stats = HashMap::new();
        stats.insert(token.clone(), ClusterStat::new(-122.4501, 37.7748, 3));
        let d = detokenizer(Arc::new(ModelStore::from_parts(stats, HashMap::new())));

        let resolved = d.resolve(&token, Some(Point::new(-122.5, 37.7))).unwrap();
        assert_eq!(resolved.tier, Tier::DataCentroid);
        assert_eq!(resolved.point, Point::new(-122.4501, 37.7748));
    }

    #[test]
    fn test_invalid_token_does_not_resolve() {
        let d = detokenizer(Arc::new(ModelStore::empty()));
        assert!(d.resolve(&Token::from("not-a-token"), None).is_none());
    }

    #[test]
    fn test_invalid_token_with_stat_still_dropped() {
        let token = Token::from("garbage");
        let mut stats = HashMap::new();
        stats.insert(token.clone(), ClusterStat::new(1.0, 1.0, 100));
        let d = detokenizer(Arc::new(ModelStore::from_parts(stats, HashMap::new())));

        assert!(d.resolve(&token, None).is_none());
    }

    #[test]
    fn test_classifier_needs_previous_point() {
        let d = detokenizer(middle_store(None));
        let token = cell(MIDDLE);

        let resolved = d.resolve(&token, None).unwrap();
        assert_eq!(resolved.tier, Tier::HexCentroid);
        assert_eq!(resolved.point, hex_centroid(&token));
    }

    #[test]
    fn test_classifier_without_stat_refines() {
        let d = detokenizer(middle_store(None));
        let previous = hex_centroid(&cell(WEST));

        let resolved = d.resolve(&cell(MIDDLE), Some(previous)).unwrap();
        assert_eq!(resolved.tier, Tier::ClusterCentroid);
        assert_eq!(resolved.point, EASTBOUND_MEAN);
    }

    #[test]
    fn test_bearing_selects_cluster() {
        let d = detokenizer(middle_store(None));

        let from_east = d
            .resolve(&cell(MIDDLE), Some(hex_centroid(&cell(EAST))))
            .unwrap();
        assert_eq!(from_east.point, WESTBOUND_MEAN);

        let from_west = d
            .resolve(&cell(MIDDLE), Some(hex_centroid(&cell(WEST))))
            .unwrap();
        assert_eq!(from_west.point, EASTBOUND_MEAN);
    }

    #[test]
    fn test_threshold_boundary_at_twenty_not_refined() {
        let d = detokenizer(middle_store(Some(20)));
        let previous = hex_centroid(&cell(WEST));

        let resolved = d.resolve(&cell(MIDDLE), Some(previous)).unwrap();
        assert_eq!(resolved.tier, Tier::DataCentroid);
        assert_eq!(resolved.point, Point::new(-122.4002, 37.7749));
    }

    #[test]
    fn test_threshold_boundary_at_twenty_one_refined() {
        let d = detokenizer(middle_store(Some(21)));
        let previous = hex_centroid(&cell(WEST));

        let resolved = d.resolve(&cell(MIDDLE), Some(previous)).unwrap();
        assert_eq!(resolved.tier, Tier::ClusterCentroid);
        assert_eq!(resolved.point, EASTBOUND_MEAN);
    }

    #[test]
    fn test_custom_threshold() {
        let config = DetokenizerConfig::default().with_min_cluster_samples(50);
        let d = Detokenizer::with_config(H3Grid::new(), middle_store(Some(21)), config);
        let previous = hex_centroid(&cell(WEST));

        let resolved = d.resolve(&cell(MIDDLE), Some(previous)).unwrap();
        assert_eq!(resolved.tier, Tier::DataCentroid);
    }

    #[test]
    fn test_sequential_dependency() {
        let d = detokenizer(middle_store(None));
        let pair = d.detokenize(&[cell(WEST), cell(MIDDLE)]);
        let alone = d.detokenize(&[cell(MIDDLE)]);

        assert_eq!(pair.points.len(), 2);
        assert_eq!(alone.points.len(), 1);
        assert_ne!(pair.points[1], alone.points[0]);
        assert_eq!(pair.tiers.cluster, 1);
        assert_eq!(alone.tiers.hex, 1);
    }

    #[test]
    fn test_invalid_tokens_dropped_without_touching_state() {
        let d = detokenizer(middle_store(None));

        let clean = d.detokenize(&[cell(WEST), cell(MIDDLE)]);
        let noisy = d.detokenize(&[
            Token::from("bogus"),
            cell(WEST),
            Token::from(""),
            cell(MIDDLE),
            Token::from("ffffffffffffffff"),
        ]);

        assert_eq!(noisy.points, clean.points);
        assert_eq!(noisy.dropped, 3);
        assert_eq!(clean.dropped, 0);
        assert!(clean.is_complete());
    }

    #[test]
    fn test_output_is_rounded() {
        let d = detokenizer(Arc::new(ModelStore::empty()));
        let token = cell(WEST);

        let result = d.detokenize(std::slice::from_ref(&token));
        assert_eq!(result.points, vec![hex_centroid(&token).rounded(6)]);
    }

    #[test]
    fn test_output_rounding_of_artifact_values() {
        let token = cell(WEST);
        let mut stats = HashMap::new();
        stats.insert(token.clone(), ClusterStat::new(-122.4194005, 37.7749995, 3));
        let d = detokenizer(Arc::new(ModelStore::from_parts(stats, HashMap::new())));

        let result = d.detokenize(&[token]);
        assert_eq!(result.points, vec![Point::new(-122.4194, 37.774999)]);
    }

    #[test]
    fn test_custom_precision() {
        let config = DetokenizerConfig::default().with_precision(2);
        let d = Detokenizer::with_config(H3Grid::new(), Arc::new(ModelStore::empty()), config);
        let token = cell(WEST);

        let point = d.detokenize(std::slice::from_ref(&token)).points[0];
        assert_eq!(point, hex_centroid(&token).rounded(2));
    }

    #[test]
    fn test_empty_sequence() {
        let d = detokenizer(Arc::new(ModelStore::empty()));
        let result = d.detokenize(&[]);
        assert!(result.points.is_empty());
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_nan_bearing_falls_back_to_anchor() {
        let d = detokenizer(middle_store(None));
        let previous = Point::new(f64::NAN, f64::NAN);

        let resolved = d.resolve(&cell(MIDDLE), Some(previous)).unwrap();
        assert_eq!(resolved.tier, Tier::HexCentroid);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let d = detokenizer(middle_store(None));
        let sequences = vec![
            vec![cell(WEST), cell(MIDDLE)],
            vec![Token::from("bad")],
            vec![cell(EAST), cell(MIDDLE), cell(WEST)],
        ];

        let batch = d.detokenize_batch(&sequences);
        assert_eq!(batch.len(), sequences.len());
        for (result, tokens) in batch.iter().zip(&sequences) {
            assert_eq!(result, &d.detokenize(tokens));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_output_never_longer_than_input(
                coords in prop::collection::vec((-80.0..80.0_f64, -179.0..179.0_f64), 0..16),
                junk in prop::collection::vec("[g-z]{1,8}", 0..8)
            ) {
                let grid = H3Grid::new();
                let mut tokens: Vec<Token> = coords
                    .iter()
                    .map(|&(lat, lon)| grid.point_to_token(lat, lon, RES).unwrap())
                    .collect();
                let valid = tokens.len();
                tokens.extend(junk.iter().map(|s| Token::from(s.as_str())));

                let result = detokenizer(Arc::new(ModelStore::empty())).detokenize(&tokens);
                prop_assert_eq!(result.points.len(), valid);
                prop_assert_eq!(result.dropped, junk.len());
                prop_assert!(result.points.len() <= tokens.len());
            }
        }
    }
}
