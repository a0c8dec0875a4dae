//! Trajtok - GPS trajectory tokenization
//!
//! Converts GPS trajectories into sequences of hierarchical hexagonal-grid
//! tokens for sequence models, and reconstructs coordinates from token
//! sequences those models generate.
//!
//! # Modules
//!
//! - [`geo`]: points, bearings, coordinate-order adapter
//! - [`grid`]: the grid index contract and its H3 implementation
//! - [`model`]: precomputed per-token cluster statistics and classifiers
//! - [`tokenizer`]: points → tokens
//! - [`detokenizer`]: tokens → points, via hex / data / cluster centroid tiers
//! - [`dataset`], [`store`]: trajectory input and tokenized dataset persistence
//! - [`pipeline`]: the above wired together
//! - [`config`], [`logging`]: application settings and log setup

pub mod config;
pub mod dataset;
pub mod detokenizer;
pub mod geo;
pub mod grid;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod tokenizer;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
