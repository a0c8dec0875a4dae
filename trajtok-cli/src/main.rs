//! Trajtok CLI - command-line interface
//!
//! Tokenizes CSV trajectory files into stored token datasets and reconstructs
//! coordinates from stored token datasets.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::common::OperationArg;
use commands::config::ConfigCommands;
use commands::detokenize::DetokenizeArgs;
use commands::tokenize::TokenizeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "trajtok")]
#[command(about = "Tokenize GPS trajectories into hexagonal-grid tokens and back", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a CSV of trajectories and save it to the trajectory store
    Tokenize {
        /// CSV file with a `trajectory` column of "lat lon,lat lon,..." values
        input: PathBuf,

        /// Grid resolution 0-15 (default from config, then 10)
        #[arg(long)]
        resolution: Option<u8>,

        /// What the dataset is for
        #[arg(long, value_enum, default_value = "pretraining")]
        operation: OperationArg,

        /// Trajectory store root (default from config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Reconstruct coordinates from a stored token dataset
    Detokenize {
        /// Stored dataset file (.bin.gz)
        dataset: PathBuf,

        /// Cluster statistics artifact (.json or .bin)
        #[arg(long)]
        clusters: Option<PathBuf>,

        /// Classifier artifact (.json or .bin)
        #[arg(long)]
        classifiers: Option<PathBuf>,

        /// Write trajectories here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a stored dataset's metadata
    Inspect {
        /// Metadata sidecar or dataset file
        path: PathBuf,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Tokenize {
            input,
            resolution,
            operation,
            store,
        } => commands::tokenize::run(TokenizeArgs {
            input,
            resolution,
            operation,
            store,
        }),
        Commands::Detokenize {
            dataset,
            clusters,
            classifiers,
            output,
        } => commands::detokenize::run(DetokenizeArgs {
            dataset,
            clusters,
            classifiers,
            output,
        }),
        Commands::Inspect { path } => commands::inspect::run(path),
        Commands::Config { command } => commands::config::run(command),
    }
}
