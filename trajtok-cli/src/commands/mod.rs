//! CLI command implementations.

pub mod common;
pub mod config;
pub mod detokenize;
pub mod inspect;
pub mod tokenize;
