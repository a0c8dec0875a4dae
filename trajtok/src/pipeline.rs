//! End-to-end trajectory pipeline.
//!
//! Ties the pieces together for the two directions data flows in:
//!
//! - raw trajectories → tokens → trajectory store (for sequence-model training
//!   or evaluation)
//! - generated token sequences → reconstructed trajectories
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trajtok::grid::H3Grid;
//! use trajtok::model::ModelStore;
//! use trajtok::pipeline::Pipeline;
//! use trajtok::store::TrajectoryStore;
//!
//! let store = Arc::new(ModelStore::load("clusters.json", "classifiers.bin")?);
//! let mut pipeline = Pipeline::new(H3Grid::new(), store)
//!     .with_store(TrajectoryStore::new("/data/store"));
//! pipeline.set_resolution(9);
//!
//! let saved = pipeline.pretrain(&trajectories)?;
//! let generated = pipeline.detokenize(&token_sequences);
//! ```

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::dataset::{read_trajectories_csv, DatasetError};
use crate::detokenizer::{Detokenized, Detokenizer, DetokenizerConfig};
use crate::geo::Point;
use crate::grid::{GridError, GridIndex, H3Grid, Token};
use crate::model::{ModelError, ModelStore};
use crate::store::{Operation, SavedDataset, StoreError, TrajectoryStore};
use crate::tokenizer::{tokenize_batch, DEFAULT_RESOLUTION};

/// Errors surfaced by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An operation needing a trajectory store was run without one.
    #[error("No trajectory store configured")]
    NoStore,
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Tokenization and detokenization over a shared grid and model store.
#[derive(Debug, Clone)]
pub struct Pipeline<G = H3Grid> {
    detokenizer: Detokenizer<G>,
    resolution: Option<u8>,
    store: Option<TrajectoryStore>,
}

impl<G: GridIndex> Pipeline<G> {
    pub fn new(grid: G, models: Arc<ModelStore>) -> Self {
        Self::with_config(grid, models, DetokenizerConfig::default())
    }

    pub fn with_config(grid: G, models: Arc<ModelStore>, config: DetokenizerConfig) -> Self {
        Self {
            detokenizer: Detokenizer::with_config(grid, models, config),
            resolution: None,
            store: None,
        }
    }

    /// Build a pipeline whose model store is loaded from artifact files.
    pub fn load(
        grid: G,
        clusters_path: impl AsRef<Path>,
        classifiers_path: impl AsRef<Path>,
        config: DetokenizerConfig,
    ) -> PipelineResult<Self> {
        let models = ModelStore::load(clusters_path, classifiers_path)?;
        Ok(Self::with_config(grid, Arc::new(models), config))
    }

    /// Attach a trajectory store for [`pretrain`](Self::pretrain) and friends.
    pub fn with_store(mut self, store: TrajectoryStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Fix the tokenization resolution.
    pub fn set_resolution(&mut self, resolution: u8) {
        self.resolution = Some(resolution);
    }

    /// Effective resolution.
    pub fn resolution(&self) -> u8 {
        self.resolution.unwrap_or(DEFAULT_RESOLUTION)
    }

    pub fn detokenizer(&self) -> &Detokenizer<G> {
        &self.detokenizer
    }

    pub fn store(&self) -> Option<&TrajectoryStore> {
        self.store.as_ref()
    }

    /// Tokenize a batch of trajectories.
    pub fn tokenize(&self, trajectories: &[Vec<Point>]) -> PipelineResult<Vec<Vec<Token>>> {
        if self.resolution.is_none() {
            info!(
                resolution = DEFAULT_RESOLUTION,
                "Tokenization resolution set by default"
            );
        }

        Ok(tokenize_batch(
            self.detokenizer.grid(),
            trajectories,
            self.resolution(),
        )?)
    }

    /// Tokenize and store trajectories for pretraining.
    pub fn pretrain(&self, trajectories: &[Vec<Point>]) -> PipelineResult<SavedDataset> {
        self.tokenize_and_save(trajectories, Operation::Pretraining)
    }

    /// Tokenize and store trajectories for evaluation.
    pub fn prepare_testing(&self, trajectories: &[Vec<Point>]) -> PipelineResult<SavedDataset> {
        self.tokenize_and_save(trajectories, Operation::Testing)
    }

    /// Tokenize and store trajectories under `operation`.
    pub fn tokenize_and_save(
        &self,
        trajectories: &[Vec<Point>],
        operation: Operation,
    ) -> PipelineResult<SavedDataset> {
        let store = self.store.as_ref().ok_or(PipelineError::NoStore)?;
        let tokens = self.tokenize(trajectories)?;
        Ok(store.save(&tokens, operation)?)
    }

    /// Read trajectories from a CSV file, tokenize and store them.
    pub fn tokenize_csv(
        &self,
        csv_path: impl AsRef<Path>,
        operation: Operation,
    ) -> PipelineResult<SavedDataset> {
        let trajectories = read_trajectories_csv(csv_path)?;
        self.tokenize_and_save(&trajectories, operation)
    }

    /// Reconstruct a batch of token sequences.
    pub fn detokenize(&self, sequences: &[Vec<Token>]) -> Vec<Detokenized> {
        self.detokenizer.detokenize_batch(sequences)
    }

    /// Load a stored dataset and reconstruct it.
    pub fn detokenize_stored(
        &self,
        data_path: impl AsRef<Path>,
    ) -> PipelineResult<Vec<Detokenized>> {
        let data_path = data_path.as_ref();
        let sequences = TrajectoryStore::load_tokenized(data_path)?;
        info!(
            path = %data_path.display(),
            trajectories = sequences.len(),
            "Detokenizing stored dataset"
        );
        Ok(self.detokenize(&sequences))
    }
}
