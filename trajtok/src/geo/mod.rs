//! Geographic primitives.
//!
//! Provides the coordinate types shared across the crate and the great-circle
//! bearing used to condition cluster selection during detokenization.

mod types;

pub use types::{round_to, LatLon, Point};

/// Forward azimuth from `from` to `to` on a spherical Earth.
///
/// Both arguments are in `(latitude, longitude)` order. Returns degrees in
/// `[0, 360)`, clockwise from north. Non-finite inputs yield NaN.
#[inline]
pub fn bearing(from: LatLon, to: LatLon) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let diff_lon = (to.lon - from.lon).to_radians();

    let x = diff_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * diff_lon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Bearing between two [`Point`]s.
///
/// This is the single place where `(lon, lat)` points are swapped into the
/// `(lat, lon)` order [`bearing`] expects.
#[inline]
pub fn bearing_between(from: Point, to: Point) -> f64 {
    bearing(from.to_lat_lon(), to.to_lat_lon())
}
