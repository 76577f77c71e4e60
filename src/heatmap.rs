//! Station density heatmap.
//!
//! Turns station snapshots into weighted heatmap points and provides the
//! zoom-keyed paint ramps the heatmap layer uses:
//! - Point weight grows with the station's bike count
//! - Intensity and radius grow with zoom so the map stays readable up close
//! - Opacity fades slightly at high zoom
//!
//! All ramps are piecewise linear and clamp outside their first and last stops.

use crate::style::Rgba;
use crate::{GeoPoint, StationSnapshot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Total bikes to point weight.
pub const WEIGHT_STOPS: [(f64, f64); 6] = [
    (0.0, 0.0),
    (3.0, 0.3),
    (10.0, 0.5),
    (20.0, 0.75),
    (35.0, 0.9),
    (50.0, 1.0),
];

/// Zoom to intensity multiplier.
pub const INTENSITY_STOPS: [(f64, f64); 4] = [(10.0, 1.5), (12.0, 2.0), (14.0, 2.5), (16.0, 3.0)];

/// Zoom to kernel radius in pixels.
pub const RADIUS_STOPS: [(f64, f64); 7] = [
    (10.0, 35.0),
    (11.0, 45.0),
    (12.0, 55.0),
    (13.0, 65.0),
    (14.0, 75.0),
    (15.0, 85.0),
    (16.0, 95.0),
];

/// Zoom to layer opacity.
pub const OPACITY_STOPS: [(f64, f64); 4] = [(10.0, 0.9), (12.0, 0.88), (14.0, 0.85), (16.0, 0.8)];

/// Accumulated density to colour.
pub const DENSITY_COLOR_STOPS: [(f64, Rgba); 8] = [
    (0.0, Rgba::new(0, 0, 0, 0.0)),
    (0.1, Rgba::new(15, 23, 100, 0.6)),
    (0.25, Rgba::new(56, 189, 248, 0.7)),
    (0.4, Rgba::new(0, 255, 200, 0.75)),
    (0.55, Rgba::new(100, 255, 100, 0.8)),
    (0.7, Rgba::new(255, 220, 50, 0.85)),
    (0.85, Rgba::new(255, 140, 50, 0.9)),
    (1.0, Rgba::new(255, 60, 60, 0.95)),
];

/// Bike count at which a station saturates the normalised intensity.
pub const DEFAULT_MAX_BIKES: u32 = 50;

/// A weighted heatmap sample for one station
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeatmapPoint {
    pub station_id: String,
    pub position: GeoPoint,
    pub total_bikes: u32,
    pub mechanical_bikes: u32,
    pub electric_bikes: u32,
    /// Kernel weight, 0 to 1
    pub weight: f64,
}

/// Paint values for the heatmap layer at one zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeatmapStyle {
    pub intensity: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl HeatmapStyle {
    pub fn at_zoom(zoom: f64) -> Self {
        Self {
            intensity: interpolate_stops(&INTENSITY_STOPS, zoom),
            radius: interpolate_stops(&RADIUS_STOPS, zoom),
            opacity: interpolate_stops(&OPACITY_STOPS, zoom),
        }
    }
}

/// Piecewise-linear lookup, clamped at both ends. Stops must be sorted by input.
pub fn interpolate_stops(stops: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + (y1 - y0) * t;
        }
    }
    last.1
}

/// Kernel weight for a station with `total_bikes` bikes.
pub fn heatmap_weight(total_bikes: u32) -> f64 {
    interpolate_stops(&WEIGHT_STOPS, total_bikes as f64)
}

/// Bikes over `max_bikes`, capped at 1. Zero when `max_bikes` is 0.
pub fn heatmap_intensity(bikes: u32, max_bikes: u32) -> f64 {
    if max_bikes == 0 {
        return 0.0;
    }
    (bikes as f64 / max_bikes as f64).min(1.0)
}

/// Colour for an accumulated density in [0, 1].
pub fn density_color(density: f64) -> Rgba {
    let first = DENSITY_COLOR_STOPS[0];
    let last = DENSITY_COLOR_STOPS[DENSITY_COLOR_STOPS.len() - 1];
    if density <= first.0 {
        return first.1;
    }
    if density >= last.0 {
        return last.1;
    }
    for pair in DENSITY_COLOR_STOPS.windows(2) {
        let (d0, c0) = pair[0];
        let (d1, c1) = pair[1];
        if density <= d1 {
            return c0.lerp(c1, (density - d0) / (d1 - d0));
        }
    }
    last.1
}

/// Heatmap samples for the installed stations with valid coordinates.
///
/// # Example
/// ```
/// use station_flow::{station_heatmap, GeoPoint, StationSnapshot};
///
/// let stations = vec![
///     StationSnapshot::new("a", "A", GeoPoint::new(48.85, 2.35), 40, 8, 2, 30),
///     StationSnapshot::new("b", "B", GeoPoint::new(48.86, 2.36), 40, 0, 0, 40)
///         .with_flags(false, false, false),
/// ];
/// let points = station_heatmap(&stations);
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].weight, 0.5);
/// ```
pub fn station_heatmap(stations: &[StationSnapshot]) -> Vec<HeatmapPoint> {
    stations
        .iter()
        .filter(|s| s.is_installed && s.position.is_valid())
        .map(|s| HeatmapPoint {
            station_id: s.id.clone(),
            position: s.position,
            total_bikes: s.total_bikes(),
            mechanical_bikes: s.mechanical_bikes,
            electric_bikes: s.electric_bikes,
            weight: heatmap_weight(s.total_bikes()),
        })
        .collect()
}
