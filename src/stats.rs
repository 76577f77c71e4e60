//! Fleet-wide summary statistics.

use crate::StationSnapshot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Totals over one snapshot refresh.
///
/// Bike, dock and capacity totals cover installed stations only.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FleetStats {
    /// All stations in the input, installed or not
    pub total_stations: usize,
    /// Installed stations
    pub active_stations: usize,
    pub total_bikes: u64,
    pub mechanical_bikes: u64,
    pub electric_bikes: u64,
    pub available_docks: u64,
    pub total_capacity: u64,
    /// Bikes over capacity across the fleet (0 when capacity is 0)
    pub average_availability: f64,
    /// Most recent station report (Unix seconds)
    pub last_updated: Option<i64>,
}

/// Reduce a snapshot set to [`FleetStats`]. Empty input gives zeroed stats.
///
/// # Example
/// ```
/// use station_flow::{compute_stats, GeoPoint, StationSnapshot};
///
/// let stations = vec![
///     StationSnapshot::new("1", "A", GeoPoint::new(48.85, 2.35), 20, 4, 6, 10).with_last_reported(1_700_000_000),
///     StationSnapshot::new("2", "B", GeoPoint::new(48.86, 2.36), 20, 0, 0, 0).with_flags(false, false, false),
/// ];
/// let stats = compute_stats(&stations);
/// assert_eq!(stats.total_stations, 2);
/// assert_eq!(stats.active_stations, 1);
/// assert_eq!(stats.total_bikes, 10);
/// assert_eq!(stats.average_availability, 0.5);
/// assert_eq!(stats.last_updated, Some(1_700_000_000));
/// ```
pub fn compute_stats(stations: &[StationSnapshot]) -> FleetStats {
    let mut stats = FleetStats {
        total_stations: stations.len(),
        ..Default::default()
    };

    for station in stations.iter().filter(|s| s.is_installed) {
        stats.active_stations += 1;
        stats.mechanical_bikes += station.mechanical_bikes as u64;
        stats.electric_bikes += station.electric_bikes as u64;
        stats.available_docks += station.available_docks as u64;
        stats.total_capacity += station.capacity as u64;
        stats.last_updated = Some(match stats.last_updated {
            Some(latest) => latest.max(station.last_reported),
            None => station.last_reported,
        });
    }
    stats.total_bikes = stats.mechanical_bikes + stats.electric_bikes;

    stats.average_availability = if stats.total_capacity > 0 {
        stats.total_bikes as f64 / stats.total_capacity as f64
    } else {
        0.0
    };

    stats
}
