//! # Geographic Utilities
//!
//! Distance and projection helpers shared by the cluster index and the trip simulator.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two points, in meters |
//! | [`haversine_km`] | Same distance in kilometers |
//! | [`lng_to_x`] / [`lat_to_y`] | Project onto the Web-Mercator unit square |
//! | [`x_to_lng`] / [`y_to_lat`] | Inverse projection |
//! | [`normalize_longitude`] | Wrap a longitude into [-180, 180] |
//!
//! ## Unit-square projection
//!
//! The cluster index works in Web-Mercator coordinates scaled to `[0, 1]` on both
//! axes: `x = 0` is the antimeridian at 180°W, `y = 0` the top edge at ~85.05°N.
//! At zoom `z` with tiles of `extent` pixels the world is `extent * 2^z` pixels
//! wide, so a pixel radius `r` becomes `r / (extent * 2^z)` in these units.

use geo::{Distance, Haversine, Point};
use std::f64::consts::PI;

use crate::GeoPoint;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.051_128_78;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance between two points using the Haversine formula.
///
/// Returns meters along a spherical Earth of radius 6,371 km.
///
/// # Example
///
/// ```rust
/// use station_flow::{GeoPoint, geo_utils};
///
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Great-circle distance in kilometers.
#[inline]
pub fn haversine_km(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    haversine_distance(p1, p2) / 1000.0
}

// =============================================================================
// Projection Functions
// =============================================================================

/// Wrap a longitude into [-180, 180].
#[inline]
pub fn normalize_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    ((lng + 180.0).rem_euclid(360.0)) - 180.0
}

/// Longitude in degrees to unit-square x.
#[inline]
pub fn lng_to_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude in degrees to unit-square y, clamped to the Mercator range.
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    let sin = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Unit-square x back to longitude in degrees.
#[inline]
pub fn x_to_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Unit-square y back to latitude in degrees.
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

// =============================================================================
// Unit Tests
// =============================================================================
