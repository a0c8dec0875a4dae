//! Grid index adapter.
//!
//! A thin contract over a hierarchical hexagonal grid: coordinates map to a
//! cell [`Token`] at a resolution, a token maps back to its cell centroid, and
//! tokens can be checked for well-formedness.
//!
//! The production implementation is [`H3Grid`]. Everything else in the crate
//! talks to the grid only through [`GridIndex`].

mod h3;
mod token;

pub use h3::{H3Grid, MAX_RESOLUTION};
pub use token::Token;

use thiserror::Error;

use crate::geo::Point;

/// Errors raised by grid lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Resolution outside the grid hierarchy.
    #[error("Invalid resolution: {0} (max: {max})", max = MAX_RESOLUTION)]
    InvalidResolution(u8),

    /// Coordinate the grid cannot index (e.g. NaN or infinite).
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Hierarchical hexagonal grid capability.
///
/// Implementations must be pure: the same inputs always yield the same
/// outputs, and no call has side effects.
pub trait GridIndex: Send + Sync {
    /// Token of the cell containing `(lat, lon)` at `resolution`.
    fn point_to_token(&self, lat: f64, lon: f64, resolution: u8) -> GridResult<Token>;

    /// Geometric centroid of the cell, or `None` if the token is malformed.
    fn token_to_centroid(&self, token: &Token) -> Option<Point>;

    /// Structural validity of a token, independent of any model data.
    fn is_valid(&self, token: &Token) -> bool {
        self.token_to_centroid(token).is_some()
    }
}

impl<G: GridIndex + ?Sized> GridIndex for &G {
    fn point_to_token(&self, lat: f64, lon: f64, resolution: u8) -> GridResult<Token> {
        (**self).point_to_token(lat, lon, resolution)
    }

    fn token_to_centroid(&self, token: &Token) -> Option<Point> {
        (**self).token_to_centroid(token)
    }

    fn is_valid(&self, token: &Token) -> bool {
        (**self).is_valid(token)
    }
}

impl<G: GridIndex + ?Sized> GridIndex for std::sync::Arc<G> {
    fn point_to_token(&self, lat: f64, lon: f64, resolution: u8) -> GridResult<Token> {
        (**self).point_to_token(lat, lon, resolution)
    }

    fn token_to_centroid(&self, token: &Token) -> Option<Point> {
        (**self).token_to_centroid(token)
    }

    fn is_valid(&self, token: &Token) -> bool {
        (**self).is_valid(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_display() {
        let err = GridError::InvalidResolution(16);
        assert_eq!(err.to_string(), "Invalid resolution: 16 (max: 15)");

        let err = GridError::InvalidCoordinate {
            lat: f64::NAN,
            lon: 1.0,
        };
        assert!(err.to_string().contains("lat=NaN"));
    }

    #[test]
    fn test_grid_usable_through_reference_and_arc() {
        fn centroid_via<G: GridIndex>(grid: G, token: &Token) -> Option<Point> {
            grid.token_to_centroid(token)
        }

        let grid = H3Grid::new();
        let token = grid.point_to_token(51.5074, -0.1278, 9).unwrap();

        let by_ref = centroid_via(&grid, &token);
        let by_arc = centroid_via(std::sync::Arc::new(H3Grid::new()), &token);
        assert!(by_ref.is_some());
        assert_eq!(by_ref, by_arc);
    }
}
