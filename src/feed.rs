//! # GBFS Feed Decoding
//!
//! Decodes the two GBFS documents a station map needs and merges them into
//! [`StationSnapshot`]s:
//! - `station_information.json`: static name, position and capacity
//! - `station_status.json`: live bike and dock counts
//!
//! Fetching is left to the caller. Static information changes rarely, so it is
//! kept in a [`StationInfoCache`] owned by whoever drives the refresh loop.
//!
//! ## Example
//!
//! ```rust
//! use station_flow::feed::{merge_feeds, parse_station_information, parse_station_status, StationInfoCache};
//!
//! let info = r#"{"data": {"stations": [
//!     {"station_id": 213688169, "name": "Benjamin Godard", "lat": 48.8659, "lon": 2.2753, "capacity": 35}
//! ]}}"#;
//! let status = r#"{"data": {"stations": [
//!     {"station_id": "213688169", "num_bikes_available": 5,
//!      "num_bikes_available_types": [{"mechanical": 3}, {"ebike": 2}],
//!      "num_docks_available": 30, "is_installed": 1, "is_renting": 1, "is_returning": 1,
//!      "last_reported": 1700000000}
//! ]}}"#;
//!
//! let mut cache = StationInfoCache::default();
//! let infos = cache.store(0, parse_station_information(info).unwrap());
//! let stations = merge_feeds(infos, &parse_station_status(status).unwrap());
//! assert_eq!(stations[0].id, "213688169");
//! assert_eq!(stations[0].total_bikes(), 5);
//! ```

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{GeoPoint, Result, StationSnapshot};

/// Static station information is reused for five minutes.
pub const DEFAULT_INFO_TTL_MS: u64 = 5 * 60 * 1000;

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: StationList<T>,
}

#[derive(Debug, Deserialize)]
struct StationList<T> {
    stations: Vec<T>,
}

/// One entry of `station_information.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    #[serde(deserialize_with = "station_id")]
    pub station_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default, rename = "stationCode")]
    pub station_code: Option<String>,
}

/// One entry of `station_status.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    #[serde(deserialize_with = "station_id")]
    pub station_id: String,
    #[serde(default)]
    pub num_bikes_available: u32,
    #[serde(default)]
    pub num_bikes_available_types: Vec<BikeTypeCount>,
    #[serde(default)]
    pub num_docks_available: u32,
    #[serde(default, deserialize_with = "flag")]
    pub is_installed: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_renting: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_returning: bool,
    /// Unix seconds
    #[serde(default)]
    pub last_reported: i64,
    #[serde(default, rename = "stationCode")]
    pub station_code: Option<String>,
}

/// An entry of `num_bikes_available_types`, e.g. `{"ebike": 2}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BikeTypeCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanical: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebike: Option<u32>,
}

impl StationStatus {
    /// Mechanical and electric counts from the bike type breakdown.
    pub fn bike_counts(&self) -> (u32, u32) {
        let mut mechanical = 0;
        let mut electric = 0;
        for entry in &self.num_bikes_available_types {
            if let Some(n) = entry.mechanical {
                mechanical = n;
            }
            if let Some(n) = entry.ebike {
                electric = n;
            }
        }
        (mechanical, electric)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Integer(i64),
}

fn station_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Integer(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Integer(i64),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => b,
        FlagRepr::Integer(n) => n == 1,
    })
}

/// Decode a `station_information.json` document.
pub fn parse_station_information(json: &str) -> Result<Vec<StationInfo>> {
    let envelope: Envelope<StationInfo> = serde_json::from_str(json)?;
    debug!("[StationFlow] Decoded {} station infos", envelope.data.stations.len());
    Ok(envelope.data.stations)
}

/// Decode a `station_status.json` document.
pub fn parse_station_status(json: &str) -> Result<Vec<StationStatus>> {
    let envelope: Envelope<StationStatus> = serde_json::from_str(json)?;
    debug!("[StationFlow] Decoded {} station statuses", envelope.data.stations.len());
    Ok(envelope.data.stations)
}

// =============================================================================
// Merge
// =============================================================================

/// Join live statuses with static information by station id.
///
/// Statuses without matching information are skipped. When the feed gives a
/// bike total but no type breakdown, the bikes are counted as mechanical. A
/// zero capacity falls back to bikes plus docks.
pub fn merge_feeds(
    infos: &HashMap<String, StationInfo>,
    statuses: &[StationStatus],
) -> Vec<StationSnapshot> {
    let mut stations = Vec::with_capacity(statuses.len());

    for status in statuses {
        let Some(info) = infos.get(&status.station_id) else {
            continue;
        };

        // Bikes the type breakdown misses are counted as mechanical
        let (mut mechanical, electric) = status.bike_counts();
        let typed_total = mechanical.saturating_add(electric);
        if status.num_bikes_available > typed_total {
            mechanical += status.num_bikes_available - typed_total;
        }
        let total_bikes = mechanical.saturating_add(electric);

        let docks = status.num_docks_available;
        let capacity = if info.capacity > 0 {
            info.capacity
        } else {
            total_bikes.saturating_add(docks)
        };

        let mut station = StationSnapshot::new(
            status.station_id.clone(),
            info.name.clone(),
            GeoPoint::new(info.lat, info.lon),
            capacity,
            mechanical,
            electric,
            docks,
        )
        .with_flags(status.is_installed, status.is_renting, status.is_returning)
        .with_last_reported(status.last_reported);
        station.station_code = info.station_code.clone().or_else(|| status.station_code.clone());
        stations.push(station);
    }

    info!(
        "[StationFlow] Merged {} stations from {} statuses",
        stations.len(),
        statuses.len()
    );
    stations
}

// =============================================================================
// Cache
// =============================================================================

/// Time-bounded store for static station information.
///
/// Time is supplied by the caller in milliseconds, so the cache never reads a clock.
#[derive(Debug, Clone)]
pub struct StationInfoCache {
    ttl_ms: u64,
    entries: Option<HashMap<String, StationInfo>>,
    stored_at: u64,
    expired: bool,
}

impl Default for StationInfoCache {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_TTL_MS)
    }
}

impl StationInfoCache {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            entries: None,
            stored_at: 0,
            expired: false,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Fresh entries, or `None` when empty, invalidated or past the TTL.
    pub fn get(&self, now: u64) -> Option<&HashMap<String, StationInfo>> {
        if self.expired || now.saturating_sub(self.stored_at) >= self.ttl_ms {
            return None;
        }
        self.entries.as_ref()
    }

    /// Entries regardless of age, for serving data after a failed refresh.
    pub fn get_stale(&self) -> Option<&HashMap<String, StationInfo>> {
        self.entries.as_ref()
    }

    /// Replace the entries, keyed by station id.
    pub fn store(&mut self, now: u64, infos: Vec<StationInfo>) -> &HashMap<String, StationInfo> {
        let entries: HashMap<String, StationInfo> = infos
            .into_iter()
            .map(|info| (info.station_id.clone(), info))
            .collect();
        info!("[StationFlow] Cached {} station infos", entries.len());
        self.stored_at = now;
        self.expired = false;
        self.entries.insert(entries)
    }

    /// Force the next `get` to miss. Stale entries stay available.
    pub fn invalidate(&mut self) {
        self.expired = true;
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries = None;
        self.expired = false;
        self.stored_at = 0;
    }
}
