//! # Station Flow
//!
//! Zoom-aware clustering and simulated trip flows for live bike-share station maps.
//!
//! This library provides:
//! - A multi-resolution spatial cluster index with exact per-cluster bike/dock sums
//! - A frame-driven trip simulator that spawns plausible trips between stations
//! - Curved trail geometry and a surface-agnostic trail renderer
//! - Fleet-wide summary statistics
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel leaf projection with rayon
//! - **`serde`** - Derive `Serialize`/`Deserialize` on public types
//! - **`feed`** - Decode and merge GBFS station feeds
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use station_flow::{
//!     BBox, ClusterConfig, FlowConfig, GeoPoint, SpatialClusterIndex, StationSnapshot,
//!     TripSimulator,
//! };
//!
//! let stations = vec![
//!     StationSnapshot::new("1", "Bastille", GeoPoint::new(48.8532, 2.3691), 30, 8, 4, 18),
//!     StationSnapshot::new("2", "Nation", GeoPoint::new(48.8483, 2.3959), 40, 10, 10, 20),
//! ];
//!
//! // Clusters for the current viewport
//! let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
//! let features = index.query(&BBox::WORLD, 3.0);
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].metrics().total_bikes, 32);
//!
//! // Simulated trips, one tick per animation frame
//! let mut simulator = TripSimulator::seeded(FlowConfig::default(), 7);
//! simulator.set_stations(&stations);
//! let trips = simulator.tick(1_000);
//! assert!(trips.len() <= 1);
//! ```

use thiserror::Error;

pub mod geo_utils;

pub mod station;
pub use station::StationSnapshot;

pub mod cluster;
pub use cluster::{
    ClusterConfig, ClusterFeature, ClusterId, ClusterMetrics, ClusterPoint, SpatialClusterIndex,
};

pub mod simulator;
pub use simulator::{BikeType, FlowConfig, Trip, TripCounts, TripEndpoint, TripSimulator};

pub mod path;
pub use path::{curve_control_point, interpolate_position, trail_points, TrailConfig};

pub mod renderer;
pub use renderer::{
    DisplayList, DrawCommand, FlowLayer, FlowRenderer, MapHost, ScreenPoint, Surface,
    TrailPalette,
};

pub mod stats;
pub use stats::{compute_stats, FleetStats};

pub mod style;
pub use style::{availability_color, cluster_color, cluster_radius, format_count, Rgba};

pub mod heatmap;
pub use heatmap::{station_heatmap, HeatmapPoint, HeatmapStyle};

// GBFS feed decoding (no network I/O)
#[cfg(feature = "feed")]
pub mod feed;

#[cfg(feature = "feed")]
pub use feed::{merge_feeds, StationInfo, StationInfoCache, StationStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the library.
///
/// Expected data sparsity (no stations, no eligible destination, renderer not
/// attached yet) is never an error; those paths return empty results instead.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The cluster id does not belong to the current index build.
    #[error("cluster {0} not found in the current index")]
    ClusterNotFound(ClusterId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "feed")]
    #[error("malformed feed payload: {0}")]
    Feed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;

// ============================================================================
// Core Types
// ============================================================================

/// A WGS84 coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use station_flow::GeoPoint;
/// let point = GeoPoint::new(48.8566, 2.3522); // Paris
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has finite, in-range coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Axis-aligned lon/lat box as reported by the map host.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BBox {
    /// The whole Web-Mercator world.
    pub const WORLD: BBox = BBox {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Smallest box enclosing all points. `None` for empty input.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut bbox = BBox {
            west: f64::MAX,
            south: f64::MAX,
            east: f64::MIN,
            north: f64::MIN,
        };
        for p in points {
            bbox.west = bbox.west.min(p.longitude);
            bbox.east = bbox.east.max(p.longitude);
            bbox.south = bbox.south.min(p.latitude);
            bbox.north = bbox.north.max(p.latitude);
        }
        Some(bbox)
    }

    /// Check whether a point lies inside the box (edges inclusive, no wraparound).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.longitude >= self.west
            && point.longitude <= self.east
            && point.latitude >= self.south
            && point.latitude <= self.north
    }
}

/// What the map host is currently showing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub bbox: BBox,
    /// Fractional zoom as reported by the camera
    pub zoom: f64,
}

impl Viewport {
    pub fn new(bbox: BBox, zoom: f64) -> Self {
        Self { bbox, zoom }
    }
}
