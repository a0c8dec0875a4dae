//! Tokenize command - turn a CSV of trajectories into a stored token dataset.

use std::path::PathBuf;
use std::sync::Arc;

use trajtok::grid::H3Grid;
use trajtok::model::ModelStore;
use trajtok::pipeline::Pipeline;
use trajtok::store::Operation;

use super::common::{resolve_resolution, resolve_store, OperationArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the tokenize command.
pub struct TokenizeArgs {
    pub input: PathBuf,
    pub resolution: Option<u8>,
    pub operation: OperationArg,
    pub store: Option<PathBuf>,
}

/// Run the tokenize command.
pub fn run(args: TokenizeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("tokenize");
    let config = runner.config();

    let resolution = resolve_resolution(args.resolution, config);
    let store = resolve_store(args.store, config);
    let operation = Operation::from(args.operation);

    // Tokenizing never consults the model store
    let mut pipeline = Pipeline::new(H3Grid::new(), Arc::new(ModelStore::empty())).with_store(store);
    pipeline.set_resolution(resolution);

    println!("Tokenizing {} at resolution {}", args.input.display(), resolution);
    let saved = pipeline.tokenize_csv(&args.input, operation)?;

    println!();
    println!("Saved {} dataset {}", operation, saved.name);
    println!("  Data:     {}", saved.data_path.display());
    println!("  Metadata: {}", saved.metadata_path.display());
    Ok(())
}
