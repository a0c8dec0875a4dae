//! Detokenize command - reconstruct coordinates from a stored token dataset.
//!
//! Writes one `lat lon,lat lon,...` line per trajectory to the output file or
//! stdout. Progress and drop counts go to stderr so stdout stays clean for
//! piping.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use trajtok::dataset::format_trajectory;
use trajtok::detokenizer::{Detokenized, TierCounts};
use trajtok::grid::H3Grid;
use trajtok::pipeline::Pipeline;

use super::common::resolve_models;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the detokenize command.
pub struct DetokenizeArgs {
    pub dataset: PathBuf,
    pub clusters: Option<PathBuf>,
    pub classifiers: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Run the detokenize command.
pub fn run(args: DetokenizeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("detokenize");
    let config = runner.config();

    let models = resolve_models(args.clusters, args.classifiers, config)?;
    let pipeline = Pipeline::with_config(
        H3Grid::new(),
        Arc::new(models),
        config.detokenizer_config(),
    );

    let results = pipeline.detokenize_stored(&args.dataset)?;

    match &args.output {
        Some(path) => write_trajectories(BufWriter::new(File::create(path)?), &results)?,
        None => write_trajectories(io::stdout().lock(), &results)?,
    }

    let summary = Summary::from_results(&results);
    info!(
        trajectories = results.len(),
        points = summary.points,
        dropped = summary.dropped,
        "Detokenization complete"
    );

    eprintln!(
        "Reconstructed {} trajectories: {} points ({} hex, {} data, {} cluster)",
        results.len(),
        summary.points,
        summary.tiers.hex,
        summary.tiers.data,
        summary.tiers.cluster
    );
    if summary.dropped > 0 {
        eprintln!(
            "Dropped {} invalid tokens across {} trajectories",
            summary.dropped, summary.incomplete
        );
    }
    if let Some(path) = &args.output {
        eprintln!("Output: {}", path.display());
    }

    Ok(())
}

/// Write one formatted line per trajectory.
fn write_trajectories(mut out: impl Write, results: &[Detokenized]) -> io::Result<()> {
    for result in results {
        writeln!(out, "{}", format_trajectory(&result.points))?;
    }
    out.flush()
}

/// Totals across a batch.
#[derive(Debug, Default)]
struct Summary {
    points: usize,
    dropped: usize,
    incomplete: usize,
    tiers: TierCounts,
}

impl Summary {
    fn from_results(results: &[Detokenized]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.points += r.points.len();
            acc.dropped += r.dropped;
            acc.incomplete += usize::from(!r.is_complete());
            acc.tiers += r.tiers;
            acc
        })
    }
}
