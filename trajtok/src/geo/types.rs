//! Coordinate types.
//!
//! Two orderings exist side by side and must never be confused:
//!
//! - [`Point`] stores `(x, y)` = `(longitude, latitude)`, the order trajectories
//!   and artifacts use.
//! - [`LatLon`] stores `(lat, lon)`, the order the grid and the bearing formula
//!   take.
//!
//! The only sanctioned way to go from one to the other is [`Point::to_lat_lon`]
//! / [`LatLon::to_point`].

use serde::{Deserialize, Serialize};

/// A coordinate pair in `(longitude, latitude)` order, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude in degrees.
    pub x: f64,
    /// Latitude in degrees.
    pub y: f64,
}

impl Point {
    /// Create a point from `(longitude, latitude)`.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a point from `(latitude, longitude)`, the order GPS fixes are
    /// usually written in.
    #[inline]
    pub const fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self { x: lon, y: lat }
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Swap into `(latitude, longitude)` order.
    #[inline]
    pub fn to_lat_lon(self) -> LatLon {
        LatLon {
            lat: self.y,
            lon: self.x,
        }
    }

    /// Round both components to `decimals` places.
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            x: round_to(self.x, decimals),
            y: round_to(self.y, decimals),
        }
    }
}

/// A coordinate pair in `(latitude, longitude)` order, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Swap back into `(longitude, latitude)` order.
    #[inline]
    pub fn to_point(self) -> Point {
        Point {
            x: self.lon,
            y: self.lat,
        }
    }
}

impl From<Point> for LatLon {
    fn from(point: Point) -> Self {
        point.to_lat_lon()
    }
}

impl From<LatLon> for Point {
    fn from(lat_lon: LatLon) -> Self {
        lat_lon.to_point()
    }
}

/// Round `value` to `decimals` decimal places.
///
/// Rounds the exact binary value, ties to even, so `0.0078125` becomes
/// `0.007812` and `-122.4194005` (stored just below the tie) becomes
/// `-122.4194`. Scaling by `10^decimals` first would round the inexact
/// product instead and disagree on such values.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}
