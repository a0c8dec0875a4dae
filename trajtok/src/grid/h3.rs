//! H3 implementation of the grid index.
//!
//! Tokens are the canonical H3 string form: the 64-bit cell index rendered as
//! lowercase hexadecimal (e.g. `8928308280fffff`).

use h3o::{CellIndex, LatLng, Resolution};

use super::{GridError, GridIndex, GridResult, Token};
use crate::geo::Point;

/// Finest H3 resolution.
pub const MAX_RESOLUTION: u8 = 15;

/// Grid index backed by Uber's H3 hierarchical hexagonal grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Grid;

impl H3Grid {
    pub fn new() -> Self {
        Self
    }

    fn parse(token: &Token) -> Option<CellIndex> {
        let raw = u64::from_str_radix(token.as_str(), 16).ok()?;
        CellIndex::try_from(raw).ok()
    }
}

impl GridIndex for H3Grid {
    fn point_to_token(&self, lat: f64, lon: f64, resolution: u8) -> GridResult<Token> {
        let resolution =
            Resolution::try_from(resolution).map_err(|_| GridError::InvalidResolution(resolution))?;
        let coord = LatLng::new(lat, lon).map_err(|_| GridError::InvalidCoordinate { lat, lon })?;
        let cell = coord.to_cell(resolution);
        Ok(Token::new(format!("{:x}", u64::from(cell))))
    }

    fn token_to_centroid(&self, token: &Token) -> Option<Point> {
        let center = LatLng::from(Self::parse(token)?);
        Some(Point::from_lat_lon(center.lat(), center.lng()))
    }

    fn is_valid(&self, token: &Token) -> bool {
        Self::parse(token).is_some()
    }
}
