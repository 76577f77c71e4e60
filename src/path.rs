//! Trail geometry for simulated trips.
//!
//! Each trip is drawn along a quadratic Bezier curve from origin to destination.
//! The control point sits on the perpendicular bisector of the segment, offset
//! by a fixed fraction of its length, so the curve is a pure function of the
//! endpoints. All math is done in lon/lat degrees before projection.

use crate::{FlowError, GeoPoint, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Perpendicular offset of the control point, as a fraction of segment length.
pub const DEFAULT_CURVE_FACTOR: f64 = 0.15;

/// Geometry and stroke settings for trip trails
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrailConfig {
    /// Points sampled behind the head, head included (default: 8)
    pub samples: usize,
    /// Fraction of the whole path covered by the trail (default: 0.15)
    pub trailing_window: f64,
    /// Control point offset factor (default: 0.15)
    pub curve_factor: f64,
    /// Under-glow stroke width in CSS pixels (default: 8)
    pub glow_width: f64,
    /// Gradient trail stroke width in CSS pixels (default: 3)
    pub trail_width: f64,
    /// Head marker radius in CSS pixels (default: 3)
    pub head_radius: f64,
    /// Head glow radius in CSS pixels (default: 6)
    pub head_glow_radius: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            samples: 8,
            trailing_window: 0.15,
            curve_factor: DEFAULT_CURVE_FACTOR,
            glow_width: 8.0,
            trail_width: 3.0,
            head_radius: 3.0,
            head_glow_radius: 6.0,
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(FlowError::InvalidConfig("trail needs at least one sample".into()));
        }
        if !(self.trailing_window > 0.0 && self.trailing_window <= 1.0) {
            return Err(FlowError::InvalidConfig(format!(
                "trailing_window must be in (0, 1], got {}",
                self.trailing_window
            )));
        }
        if !self.curve_factor.is_finite() {
            return Err(FlowError::InvalidConfig("curve_factor must be finite".into()));
        }
        Ok(())
    }
}

/// Control point of the trip curve.
///
/// Midpoint of the segment shifted along its left-hand normal by
/// `length * curve_factor`. A zero-length segment yields the midpoint.
pub fn curve_control_point(origin: &GeoPoint, destination: &GeoPoint, curve_factor: f64) -> GeoPoint {
    let mid_lng = (origin.longitude + destination.longitude) / 2.0;
    let mid_lat = (origin.latitude + destination.latitude) / 2.0;
    let dx = destination.longitude - origin.longitude;
    let dy = destination.latitude - origin.latitude;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return GeoPoint::new(mid_lat, mid_lng);
    }

    let offset = len * curve_factor;
    GeoPoint::new(mid_lat + dx / len * offset, mid_lng - dy / len * offset)
}

/// Point at parameter `t` on the trip curve with the default curve factor.
///
/// # Example
/// ```
/// use station_flow::{interpolate_position, GeoPoint};
///
/// let origin = GeoPoint::new(48.85, 2.35);
/// let destination = GeoPoint::new(48.86, 2.37);
/// assert_eq!(interpolate_position(&origin, &destination, 0.0), origin);
/// assert_eq!(interpolate_position(&origin, &destination, 1.0), destination);
/// ```
pub fn interpolate_position(origin: &GeoPoint, destination: &GeoPoint, t: f64) -> GeoPoint {
    interpolate_with_factor(origin, destination, t, DEFAULT_CURVE_FACTOR)
}

/// Point at parameter `t` on a curve with an explicit control offset.
pub fn interpolate_with_factor(
    origin: &GeoPoint,
    destination: &GeoPoint,
    t: f64,
    curve_factor: f64,
) -> GeoPoint {
    let control = curve_control_point(origin, destination, curve_factor);
    let u = 1.0 - t;
    let a = u * u;
    let b = 2.0 * u * t;
    let c = t * t;
    GeoPoint::new(
        a * origin.latitude + b * control.latitude + c * destination.latitude,
        a * origin.longitude + b * control.longitude + c * destination.longitude,
    )
}

/// Sample the trail behind a trip head at `progress`.
///
/// Returns up to `config.samples` points, head first. Sample `i` sits at
/// `progress - i / samples * trailing_window`; samples that would fall before
/// the origin are omitted.
pub fn trail_points(
    origin: &GeoPoint,
    destination: &GeoPoint,
    progress: f64,
    config: &TrailConfig,
) -> Vec<GeoPoint> {
    let n = config.samples;
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let t = progress - (i as f64 / n as f64) * config.trailing_window;
        if t < 0.0 {
            continue;
        }
        points.push(interpolate_with_factor(origin, destination, t, config.curve_factor));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_control_point_offset() {
        let origin = GeoPoint::new(0.0, 0.0);
        let destination = GeoPoint::new(0.0, 2.0);
        let control = curve_control_point(&origin, &destination, 0.15);
        assert!(approx_eq(control.longitude, 1.0, 1e-12));
        assert!(approx_eq(control.latitude, 0.3, 1e-12));

        // Reversing the segment flips the bend to the other side
        let control = curve_control_point(&destination, &origin, 0.15);
        assert!(approx_eq(control.latitude, -0.3, 1e-12));
    }

    #[test]
    fn test_degenerate_segment() {
        let p = GeoPoint::new(48.85, 2.35);
        assert_eq!(curve_control_point(&p, &p, 0.15), p);
        let q = interpolate_position(&p, &p, 0.4);
        assert!(approx_eq(q.latitude, p.latitude, 1e-12) && approx_eq(q.longitude, p.longitude, 1e-12));
    }

    #[test]
    fn test_midpoint_value() {
        let origin = GeoPoint::new(0.0, 0.0);
        let destination = GeoPoint::new(0.0, 2.0);
        let mid = interpolate_position(&origin, &destination, 0.5);
        assert!(approx_eq(mid.longitude, 1.0, 1e-12));
        assert!(approx_eq(mid.latitude, 0.15, 1e-12));
    }

    #[test]
    fn test_bit_reproducible() {
        let origin = GeoPoint::new(48.853_2, 2.369_1);
        let destination = GeoPoint::new(48.848_3, 2.395_9);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let a = interpolate_position(&origin, &destination, t);
            let b = interpolate_position(&origin, &destination, t);
            assert_eq!(a.latitude.to_bits(), b.latitude.to_bits());
            assert_eq!(a.longitude.to_bits(), b.longitude.to_bits());
        }
    }

    #[test]
    fn test_trail_omits_negative_progress() {
        let origin = GeoPoint::new(48.85, 2.35);
        let destination = GeoPoint::new(48.86, 2.37);
        let config = TrailConfig::default();

        assert_eq!(trail_points(&origin, &destination, 0.5, &config).len(), 8);
        // Offsets are 0, 0.01875, 0.0375, 0.05625, ...
        assert_eq!(trail_points(&origin, &destination, 0.05, &config).len(), 3);
        assert_eq!(trail_points(&origin, &destination, 0.0, &config), vec![origin]);
    }

    #[test]
    fn test_trail_head_first() {
        let origin = GeoPoint::new(48.85, 2.35);
        let destination = GeoPoint::new(48.86, 2.37);
        let config = TrailConfig::default();
        let trail = trail_points(&origin, &destination, 0.6, &config);
        assert_eq!(trail[0], interpolate_position(&origin, &destination, 0.6));
        // Points move back toward the origin
        for pair in trail.windows(2) {
            assert!(pair[1].longitude < pair[0].longitude);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(TrailConfig::default().validate().is_ok());
        assert!(TrailConfig { samples: 0, ..Default::default() }.validate().is_err());
        assert!(TrailConfig { trailing_window: 0.0, ..Default::default() }.validate().is_err());
    }
}
