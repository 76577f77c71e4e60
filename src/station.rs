//! Station snapshots: one station's merged static and real-time state.

use crate::GeoPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One station at one refresh cycle.
///
/// Snapshots are immutable once produced. Counts come straight from the
/// operator feed, so `total_bikes() + available_docks` may exceed `capacity`
/// by reporting noise; every consumer tolerates that.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationSnapshot {
    /// Unique station identifier
    pub id: String,
    pub name: String,
    /// Operator-facing short code, when the feed publishes one
    pub station_code: Option<String>,
    pub position: GeoPoint,
    pub capacity: u32,
    pub mechanical_bikes: u32,
    pub electric_bikes: u32,
    pub available_docks: u32,
    pub is_installed: bool,
    pub is_renting: bool,
    pub is_returning: bool,
    /// Last report from the station (Unix timestamp, seconds)
    pub last_reported: i64,
}

impl StationSnapshot {
    /// Create an installed, renting and returning station.
    ///
    /// # Example
    /// ```
    /// use station_flow::{GeoPoint, StationSnapshot};
    ///
    /// let station = StationSnapshot::new("16107", "Benjamin Godard", GeoPoint::new(48.8659, 2.2753), 35, 3, 2, 30);
    /// assert_eq!(station.total_bikes(), 5);
    /// assert!((station.availability_ratio() - 5.0 / 35.0).abs() < 1e-12);
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: GeoPoint,
        capacity: u32,
        mechanical_bikes: u32,
        electric_bikes: u32,
        available_docks: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            station_code: None,
            position,
            capacity,
            mechanical_bikes,
            electric_bikes,
            available_docks,
            is_installed: true,
            is_renting: true,
            is_returning: true,
            last_reported: 0,
        }
    }

    /// Set the operational flags.
    pub fn with_flags(mut self, installed: bool, renting: bool, returning: bool) -> Self {
        self.is_installed = installed;
        self.is_renting = renting;
        self.is_returning = returning;
        self
    }

    pub fn with_station_code(mut self, code: impl Into<String>) -> Self {
        self.station_code = Some(code.into());
        self
    }

    /// Set the last report timestamp (Unix seconds).
    pub fn with_last_reported(mut self, last_reported: i64) -> Self {
        self.last_reported = last_reported;
        self
    }

    /// Mechanical plus electric bikes.
    #[inline]
    pub fn total_bikes(&self) -> u32 {
        self.mechanical_bikes.saturating_add(self.electric_bikes)
    }

    /// Bikes over capacity; 0 for a zero-capacity station.
    pub fn availability_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.total_bikes() as f64 / self.capacity as f64
    }

    /// Occupied slots over capacity; 0 for a zero-capacity station.
    ///
    /// Negative when the feed reports more free docks than the capacity.
    pub fn fill_level(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.capacity as f64 - self.available_docks as f64) / self.capacity as f64
    }

    /// Usable as a trip origin.
    pub fn can_rent(&self) -> bool {
        self.is_renting && self.total_bikes() > 0
    }

    /// Usable as a trip destination.
    pub fn can_return(&self) -> bool {
        self.is_returning && self.available_docks > 0
    }
}
