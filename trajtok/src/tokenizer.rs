//! Trajectory tokenization.
//!
//! Every point is mapped to the grid cell containing it, independently of its
//! neighbours, so the output always has one token per input point.

use rayon::prelude::*;

use crate::geo::Point;
use crate::grid::{GridIndex, GridResult, Token};

/// Resolution used when none is configured.
pub const DEFAULT_RESOLUTION: u8 = 10;

/// Tokenize one trajectory at a fixed resolution.
///
/// # Errors
///
/// Fails on the first point (or the resolution) the grid rejects.
pub fn tokenize<G: GridIndex + ?Sized>(
    grid: &G,
    points: &[Point],
    resolution: u8,
) -> GridResult<Vec<Token>> {
    points
        .iter()
        .map(|point| grid.point_to_token(point.lat(), point.lon(), resolution))
        .collect()
}

/// Tokenize many trajectories in parallel, preserving order.
pub fn tokenize_batch<G: GridIndex + ?Sized>(
    grid: &G,
    trajectories: &[Vec<Point>],
    resolution: u8,
) -> GridResult<Vec<Vec<Token>>> {
    trajectories
        .par_iter()
        .map(|points| tokenize(grid, points, resolution))
        .collect()
}
