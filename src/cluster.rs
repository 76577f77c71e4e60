//! # Spatial Cluster Index
//!
//! Multi-resolution clustering of station points for map display.
//!
//! ## Algorithm
//! 1. Project every station onto the Web-Mercator unit square (one leaf node each)
//! 2. Starting from the leaves at `max_zoom + 1`, build each zoom level from the one above it:
//!    nodes closer than `radius` pixels at that zoom's scale are chained together
//!    (single linkage, so merging is transitive) and each chain of two or more nodes
//!    becomes one aggregate node
//! 3. Aggregate metrics are the sum of their children's metrics, so every level
//!    carries exact totals of the stations beneath it
//! 4. Each level keeps its own R-tree, so a viewport query is one envelope lookup
//!
//! Building is the only expensive step and runs once per snapshot refresh.
//! Cluster ids index into the build's node arena: they are stable within one
//! build and carry no meaning across rebuilds.

use log::{info, warn};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Instant;

use crate::geo_utils::{lat_to_y, lng_to_x, normalize_longitude, x_to_lng, y_to_lat};
use crate::{BBox, FlowError, GeoPoint, Result, StationSnapshot, Viewport};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest supported `max_zoom`.
pub const MAX_SUPPORTED_ZOOM: u8 = 24;

/// Configuration for cluster index builds
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterConfig {
    /// Merge radius in screen pixels (default: 60)
    pub radius: f64,
    /// Tile extent in pixels the radius is measured against (default: 512)
    pub extent: f64,
    /// Lowest zoom level that gets clusters (default: 0)
    pub min_zoom: u8,
    /// Highest zoom level that gets clusters; above it points are raw (default: 16)
    pub max_zoom: u8,
    /// Minimum number of stations forming a cluster (default: 2)
    pub min_points: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            extent: 512.0,
            min_zoom: 0,
            max_zoom: 16,
            min_points: 2,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "cluster radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "tile extent must be positive, got {}",
                self.extent
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(FlowError::InvalidConfig(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(FlowError::InvalidConfig(format!(
                "max_zoom {} exceeds {}",
                self.max_zoom, MAX_SUPPORTED_ZOOM
            )));
        }
        if self.min_points < 2 {
            return Err(FlowError::InvalidConfig(
                "min_points must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identifier of an aggregate cluster, valid for the index build that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summed station counters carried by every feature.
///
/// Addition is associative and commutative, so the totals of a cluster do not
/// depend on the order its members were merged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterMetrics {
    pub total_bikes: u64,
    pub mechanical_bikes: u64,
    pub electric_bikes: u64,
    pub available_docks: u64,
    pub capacity: u64,
}

impl ClusterMetrics {
    pub fn from_station(station: &StationSnapshot) -> Self {
        Self {
            total_bikes: station.total_bikes() as u64,
            mechanical_bikes: station.mechanical_bikes as u64,
            electric_bikes: station.electric_bikes as u64,
            available_docks: station.available_docks as u64,
            capacity: station.capacity as u64,
        }
    }

    /// Bikes over capacity; 0 when the capacity is 0.
    pub fn availability_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.total_bikes as f64 / self.capacity as f64
    }
}

impl AddAssign for ClusterMetrics {
    fn add_assign(&mut self, other: Self) {
        self.total_bikes += other.total_bikes;
        self.mechanical_bikes += other.mechanical_bikes;
        self.electric_bikes += other.electric_bikes;
        self.available_docks += other.available_docks;
        self.capacity += other.capacity;
    }
}

impl Add for ClusterMetrics {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for ClusterMetrics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A single station as seen by the index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterPoint {
    pub station_id: String,
    pub name: String,
    pub position: GeoPoint,
    pub metrics: ClusterMetrics,
    pub availability_ratio: f64,
}

impl From<&StationSnapshot> for ClusterPoint {
    fn from(station: &StationSnapshot) -> Self {
        Self {
            station_id: station.id.clone(),
            name: station.name.clone(),
            position: station.position,
            metrics: ClusterMetrics::from_station(station),
            availability_ratio: station.availability_ratio(),
        }
    }
}

/// What to draw at one spot of the map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ClusterFeature {
    /// A single, unmerged station
    Point(ClusterPoint),
    /// Several stations merged at this zoom
    Aggregate {
        id: ClusterId,
        /// Point-count weighted centroid
        position: GeoPoint,
        point_count: u32,
        metrics: ClusterMetrics,
    },
}

impl ClusterFeature {
    pub fn position(&self) -> GeoPoint {
        match self {
            ClusterFeature::Point(point) => point.position,
            ClusterFeature::Aggregate { position, .. } => *position,
        }
    }

    pub fn metrics(&self) -> &ClusterMetrics {
        match self {
            ClusterFeature::Point(point) => &point.metrics,
            ClusterFeature::Aggregate { metrics, .. } => metrics,
        }
    }

    /// Number of stations represented (1 for a point).
    pub fn point_count(&self) -> u32 {
        match self {
            ClusterFeature::Point(_) => 1,
            ClusterFeature::Aggregate { point_count, .. } => *point_count,
        }
    }

    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            ClusterFeature::Point(_) => None,
            ClusterFeature::Aggregate { id, .. } => Some(*id),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterFeature::Aggregate { .. })
    }
}

// =============================================================================
// Index internals
// =============================================================================

/// A node of the cluster hierarchy (leaf station or aggregate).
#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
    point_count: u32,
    metrics: ClusterMetrics,
    /// Zoom level the node was created at (`max_zoom + 1` for leaves)
    origin_zoom: u8,
    /// Arena indices of the merged nodes one level up (empty for leaves)
    children: Vec<usize>,
    /// Index into the station points for leaves
    leaf: Option<usize>,
}

/// A node's position in one level's R-tree.
#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    x: f64,
    y: f64,
    /// Position in the level's node list
    slot: usize,
    /// Arena index
    node: usize,
}

impl RTreeObject for LevelEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for LevelEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Debug)]
struct Level {
    nodes: Vec<usize>,
    tree: RTree<LevelEntry>,
}

impl Level {
    fn new(nodes: Vec<usize>, arena: &[Node]) -> Self {
        let entries: Vec<LevelEntry> = nodes
            .iter()
            .enumerate()
            .map(|(slot, &node)| LevelEntry {
                x: arena[node].x,
                y: arena[node].y,
                slot,
                node,
            })
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }
}

/// Zoom-level cluster hierarchy over one snapshot set.
///
/// # Example
/// ```
/// use station_flow::{BBox, ClusterConfig, GeoPoint, SpatialClusterIndex, StationSnapshot};
///
/// let stations: Vec<StationSnapshot> = (0..10)
///     .map(|i| {
///         let position = GeoPoint::new(48.85 + i as f64 * 0.001, 2.35);
///         StationSnapshot::new(i.to_string(), format!("Station {}", i), position, 20, 5, 5, 10)
///     })
///     .collect();
///
/// let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
///
/// // Zoomed out: one cluster carrying all the bikes
/// let features = index.query(&BBox::WORLD, 5.0);
/// assert_eq!(features.len(), 1);
/// assert_eq!(features[0].metrics().total_bikes, 100);
///
/// // Above max zoom: raw stations
/// assert_eq!(index.query(&BBox::WORLD, 20.0).len(), 10);
/// ```
#[derive(Debug)]
pub struct SpatialClusterIndex {
    config: ClusterConfig,
    points: Vec<ClusterPoint>,
    arena: Vec<Node>,
    /// `levels[i]` holds zoom `min_zoom + i`; the last level is the raw leaves
    levels: Vec<Level>,
}

impl SpatialClusterIndex {
    /// Build the index over installed stations with finite coordinates.
    pub fn from_snapshots(snapshots: &[StationSnapshot], config: ClusterConfig) -> Result<Self> {
        let points: Vec<ClusterPoint> = snapshots
            .iter()
            .filter(|s| s.is_installed)
            .map(ClusterPoint::from)
            .collect();
        Self::build(points, config)
    }

    /// Build the index over the given points.
    ///
    /// Points with non-finite coordinates are dropped. Longitudes are wrapped into
    /// [-180, 180]. Fails only on an invalid config.
    pub fn build(points: Vec<ClusterPoint>, config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let input_len = points.len();
        let points: Vec<ClusterPoint> = points
            .into_iter()
            .filter(|p| p.position.latitude.is_finite() && p.position.longitude.is_finite())
            .map(|mut p| {
                p.position.longitude = normalize_longitude(p.position.longitude);
                p
            })
            .collect();

        if points.len() < input_len {
            warn!(
                "[StationFlow] Dropped {} points with non-finite coordinates",
                input_len - points.len()
            );
        }

        let leaf_zoom = config.max_zoom + 1;
        let mut arena: Vec<Node> = project_points(&points)
            .into_iter()
            .zip(points.iter())
            .enumerate()
            .map(|(i, ((x, y), point))| Node {
                x,
                y,
                point_count: 1,
                metrics: point.metrics,
                origin_zoom: leaf_zoom,
                children: Vec::new(),
                leaf: Some(i),
            })
            .collect();

        let leaf_nodes: Vec<usize> = (0..arena.len()).collect();
        let mut levels_desc = vec![Level::new(leaf_nodes, &arena)];

        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let above = &levels_desc[levels_desc.len() - 1];
            let nodes = cluster_level(&mut arena, &above.nodes, &above.tree, zoom, &config);
            levels_desc.push(Level::new(nodes, &arena));
        }
        levels_desc.reverse();

        let cluster_count = arena.iter().filter(|n| n.leaf.is_none()).count();
        info!(
            "[StationFlow] Cluster index built: {} points, {} levels, {} clusters in {:?}",
            points.len(),
            levels_desc.len(),
            cluster_count,
            start.elapsed()
        );

        Ok(Self {
            config,
            points,
            arena,
            levels: levels_desc,
        })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Number of indexed stations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_zoom(&self) -> u8 {
        self.config.max_zoom
    }

    /// Features visible inside `bbox` at `zoom` (floored).
    ///
    /// Zooms above `max_zoom` return raw stations; zooms below `min_zoom` use the
    /// `min_zoom` level. A box spanning 360° or more of longitude covers the whole
    /// world, and a box with `west > east` is treated as crossing the antimeridian.
    pub fn query(&self, bbox: &BBox, zoom: f64) -> Vec<ClusterFeature> {
        if self.points.is_empty() {
            return Vec::new();
        }

        let level = &self.levels[self.level_index(zoom)];
        let south = bbox.south.clamp(-90.0, 90.0);
        let north = bbox.north.clamp(-90.0, 90.0);

        let mut results = Vec::new();
        if bbox.east - bbox.west >= 360.0 {
            self.collect_in_box(level, -180.0, south, 180.0, north, &mut results);
            return results;
        }

        let west = normalize_longitude(bbox.west);
        let east = normalize_longitude(bbox.east);
        if west > east {
            self.collect_in_box(level, west, south, 180.0, north, &mut results);
            self.collect_in_box(level, -180.0, south, east, north, &mut results);
        } else {
            self.collect_in_box(level, west, south, east, north, &mut results);
        }
        results
    }

    /// [`query`](Self::query) for the host's current viewport.
    pub fn query_viewport(&self, viewport: &Viewport) -> Vec<ClusterFeature> {
        self.query(&viewport.bbox, viewport.zoom)
    }

    /// Zoom at which the cluster splits into its children.
    pub fn expansion_zoom(&self, id: ClusterId) -> Result<u8> {
        let node = self.aggregate(id)?;
        Ok(node.origin_zoom + 1)
    }

    /// Features the cluster splits into one zoom level below its origin.
    pub fn children(&self, id: ClusterId) -> Result<Vec<ClusterFeature>> {
        let node = self.aggregate(id)?;
        Ok(node.children.iter().map(|&c| self.feature(c)).collect())
    }

    /// Stations under the cluster, skipping `offset` and returning at most `limit`.
    pub fn leaves(&self, id: ClusterId, limit: usize, offset: usize) -> Result<Vec<&ClusterPoint>> {
        let node = self.aggregate(id)?;
        let mut stack: Vec<usize> = node.children.iter().rev().copied().collect();
        let mut skipped = 0;
        let mut leaves = Vec::new();

        while let Some(idx) = stack.pop() {
            if leaves.len() >= limit {
                break;
            }
            let current = &self.arena[idx];
            match current.leaf {
                Some(point) => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        leaves.push(&self.points[point]);
                    }
                }
                None => stack.extend(current.children.iter().rev().copied()),
            }
        }
        Ok(leaves)
    }

    fn level_index(&self, zoom: f64) -> usize {
        let min = self.config.min_zoom as f64;
        let max = self.config.max_zoom as f64 + 1.0;
        let z = if zoom.is_nan() {
            min
        } else {
            zoom.floor().clamp(min, max)
        };
        (z - min) as usize
    }

    fn collect_in_box(
        &self,
        level: &Level,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        out: &mut Vec<ClusterFeature>,
    ) {
        let envelope = AABB::from_corners(
            [lng_to_x(west), lat_to_y(north)],
            [lng_to_x(east), lat_to_y(south)],
        );
        out.extend(
            level
                .tree
                .locate_in_envelope(&envelope)
                .map(|entry| self.feature(entry.node)),
        );
    }

    fn aggregate(&self, id: ClusterId) -> Result<&Node> {
        self.arena
            .get(id.0 as usize)
            .filter(|node| node.leaf.is_none())
            .ok_or(FlowError::ClusterNotFound(id))
    }

    fn feature(&self, idx: usize) -> ClusterFeature {
        let node = &self.arena[idx];
        match node.leaf {
            Some(point) => ClusterFeature::Point(self.points[point].clone()),
            None => ClusterFeature::Aggregate {
                id: ClusterId(idx as u32),
                position: GeoPoint::new(y_to_lat(node.y), x_to_lng(node.x)),
                point_count: node.point_count,
                metrics: node.metrics,
            },
        }
    }
}

/// Build one zoom level from the level above it.
///
/// Returns the arena indices of the level's nodes. New aggregates are appended
/// to the arena; nodes that merge with nothing pass through unchanged.
fn cluster_level(
    arena: &mut Vec<Node>,
    above: &[usize],
    above_tree: &RTree<LevelEntry>,
    zoom: u8,
    config: &ClusterConfig,
) -> Vec<usize> {
    let r = config.radius / (config.extent * 2f64.powi(zoom as i32));
    let r2 = r * r;

    let mut visited = vec![false; above.len()];
    let mut level_nodes = Vec::with_capacity(above.len());
    let mut component: Vec<usize> = Vec::new();
    let mut frontier: Vec<usize> = Vec::new();

    for start in 0..above.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        component.clear();
        component.push(start);
        frontier.push(start);

        while let Some(slot) = frontier.pop() {
            let node = &arena[above[slot]];
            for neighbor in above_tree.locate_within_distance([node.x, node.y], r2) {
                if !visited[neighbor.slot] {
                    visited[neighbor.slot] = true;
                    component.push(neighbor.slot);
                    frontier.push(neighbor.slot);
                }
            }
        }

        let point_count: u32 = component.iter().map(|&s| arena[above[s]].point_count).sum();
        if component.len() < 2 || point_count < config.min_points {
            level_nodes.extend(component.iter().map(|&s| above[s]));
            continue;
        }

        let mut wx = 0.0;
        let mut wy = 0.0;
        let mut metrics = ClusterMetrics::default();
        for &slot in &component {
            let member = &arena[above[slot]];
            wx += member.x * member.point_count as f64;
            wy += member.y * member.point_count as f64;
            metrics += member.metrics;
        }

        arena.push(Node {
            x: wx / point_count as f64,
            y: wy / point_count as f64,
            point_count,
            metrics,
            origin_zoom: zoom,
            children: component.iter().map(|&s| above[s]).collect(),
            leaf: None,
        });
        level_nodes.push(arena.len() - 1);
    }

    level_nodes
}

/// Project station positions onto the unit square.
#[cfg(feature = "parallel")]
fn project_points(points: &[ClusterPoint]) -> Vec<(f64, f64)> {
    use rayon::prelude::*;

    points
        .par_iter()
        .map(|p| (lng_to_x(p.position.longitude), lat_to_y(p.position.latitude)))
        .collect()
}

/// Project station positions onto the unit square.
#[cfg(not(feature = "parallel"))]
fn project_points(points: &[ClusterPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (lng_to_x(p.position.longitude), lat_to_y(p.position.latitude)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lng: f64, mechanical: u32, electric: u32, docks: u32) -> StationSnapshot {
        StationSnapshot::new(
            id,
            format!("Station {}", id),
            GeoPoint::new(lat, lng),
            mechanical + electric + docks,
            mechanical,
            electric,
            docks,
        )
    }

    /// A deterministic spread of stations over central Paris.
    fn paris_grid(n: usize) -> Vec<StationSnapshot> {
        (0..n)
            .map(|i| {
                let lat = 48.80 + (i % 40) as f64 * 0.0031 + (i as f64 * 0.37).sin() * 0.0007;
                let lng = 2.25 + (i / 40) as f64 * 0.0043 + (i as f64 * 0.53).cos() * 0.0009;
                station(&i.to_string(), lat, lng, (i % 7) as u32, (i % 5) as u32, (i % 11) as u32)
            })
            .collect()
    }

    fn sum_metrics(features: &[ClusterFeature]) -> ClusterMetrics {
        features.iter().map(|f| *f.metrics()).sum()
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialClusterIndex::from_snapshots(&[], ClusterConfig::default()).unwrap();
        assert!(index.is_empty());
        assert!(index.query(&BBox::WORLD, 10.0).is_empty());
        assert!(matches!(
            index.expansion_zoom(ClusterId(0)),
            Err(FlowError::ClusterNotFound(ClusterId(0)))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClusterConfig { min_zoom: 10, max_zoom: 5, ..Default::default() };
        assert!(matches!(
            SpatialClusterIndex::build(vec![], config),
            Err(FlowError::InvalidConfig(_))
        ));
        let config = ClusterConfig { radius: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = ClusterConfig { max_zoom: 30, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aggregation_matches_raw_sums_at_every_zoom() {
        let stations = paris_grid(600);
        let expected: ClusterMetrics = stations.iter().map(ClusterMetrics::from_station).sum();
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();

        for zoom in 0..=18 {
            let features = index.query(&BBox::WORLD, zoom as f64);
            assert_eq!(sum_metrics(&features), expected, "zoom {}", zoom);
            let count: u32 = features.iter().map(|f| f.point_count()).sum();
            assert_eq!(count as usize, stations.len(), "zoom {}", zoom);
        }
    }

    #[test]
    fn test_monotonic_collapse() {
        let stations = paris_grid(600);
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();

        let mut previous = 0;
        for zoom in 0..=17 {
            let count = index.query(&BBox::WORLD, zoom as f64).len();
            assert!(count >= previous, "zoom {}: {} < {}", zoom, count, previous);
            previous = count;
        }
        assert_eq!(previous, stations.len());
    }

    #[test]
    fn test_above_max_zoom_returns_raw_points() {
        let stations = paris_grid(50);
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let features = index.query(&BBox::WORLD, 17.0);
        assert_eq!(features.len(), 50);
        assert!(features.iter().all(|f| !f.is_cluster()));
        // Fractional and out-of-range zooms floor and clamp
        assert_eq!(index.query(&BBox::WORLD, 23.7).len(), 50);
        assert_eq!(index.query(&BBox::WORLD, -3.0).len(), 1);
    }

    #[test]
    fn test_transitive_merge_within_level() {
        // A-B and B-C are within radius at zoom 14, A-C is not: all three collapse
        let spacing = 0.0025; // ~278 m; radius at z14 is ~0.0026° of longitude
        let stations = vec![
            station("a", 0.0, 0.0, 1, 0, 1),
            station("b", 0.0, spacing, 1, 0, 1),
            station("c", 0.0, 2.0 * spacing, 1, 0, 1),
        ];
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let features = index.query(&BBox::WORLD, 14.0);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].point_count(), 3);
    }

    #[test]
    fn test_expansion_zoom_and_children() {
        let stations = vec![
            station("a", 48.8500, 2.3500, 2, 1, 3),
            station("b", 48.8505, 2.3505, 4, 0, 1),
            station("c", 48.9500, 2.5500, 1, 1, 1),
        ];
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();

        let top = index.query(&BBox::WORLD, 0.0);
        assert_eq!(top.len(), 1);
        let id = top[0].cluster_id().unwrap();

        let expansion = index.expansion_zoom(id).unwrap();
        let split = index.query(&BBox::WORLD, expansion as f64);
        assert!(split.len() >= 2);
        // One level shallower it is still a single feature
        assert_eq!(index.query(&BBox::WORLD, expansion as f64 - 1.0).len(), 1);

        let children = index.children(id).unwrap();
        assert!(children.len() >= 2);
        assert_eq!(sum_metrics(&children), *top[0].metrics());
    }

    #[test]
    fn test_unknown_cluster_id_is_not_found() {
        let stations = paris_grid(20);
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        // Leaf nodes are not clusters
        assert!(matches!(index.expansion_zoom(ClusterId(0)), Err(FlowError::ClusterNotFound(_))));
        assert!(matches!(index.children(ClusterId(99_999)), Err(FlowError::ClusterNotFound(_))));
        assert!(matches!(index.leaves(ClusterId(99_999), 10, 0), Err(FlowError::ClusterNotFound(_))));
    }

    #[test]
    fn test_leaves_paging() {
        let stations = paris_grid(30);
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let top = index.query(&BBox::WORLD, 0.0);
        let id = top[0].cluster_id().unwrap();

        let all = index.leaves(id, usize::MAX, 0).unwrap();
        assert_eq!(all.len(), 30);

        let page = index.leaves(id, 10, 25).unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].station_id, all[25].station_id);
    }

    #[test]
    fn test_bbox_filtering() {
        let stations = vec![
            station("paris", 48.85, 2.35, 1, 1, 1),
            station("lyon", 45.76, 4.84, 1, 1, 1),
        ];
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let around_paris = BBox::new(2.0, 48.5, 2.7, 49.0);
        let features = index.query(&around_paris, 12.0);
        assert_eq!(features.len(), 1);
        match &features[0] {
            ClusterFeature::Point(p) => assert_eq!(p.station_id, "paris"),
            other => panic!("expected a point, got {:?}", other),
        }
    }

    #[test]
    fn test_antimeridian_query() {
        let stations = vec![
            station("fiji", -17.7, 178.0, 1, 0, 1),
            station("samoa", -13.8, -172.0, 1, 0, 1),
            station("paris", 48.85, 2.35, 1, 0, 1),
        ];
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let pacific = BBox::new(170.0, -30.0, -165.0, 0.0);
        let features = index.query(&pacific, 10.0);
        assert_eq!(features.len(), 2);

        let wide = BBox::new(-400.0, -90.0, 400.0, 90.0);
        assert_eq!(index.query(&wide, 10.0).len(), 3);
    }

    #[test]
    fn test_non_finite_and_uninstalled_dropped() {
        let mut stations = paris_grid(5);
        stations.push(station("nan", f64::NAN, 2.35, 5, 5, 5));
        stations.push(station("inf", 48.85, f64::INFINITY, 5, 5, 5));
        stations.push(station("off", 48.85, 2.35, 5, 5, 5).with_flags(false, false, false));
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(index.query(&BBox::WORLD, 20.0).len(), 5);
    }

    #[test]
    fn test_cluster_position_is_weighted_centroid() {
        let stations = vec![
            station("a", 10.0, 10.0, 1, 0, 0),
            station("b", 10.0, 10.001, 1, 0, 0),
        ];
        let index = SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()).unwrap();
        let features = index.query(&BBox::WORLD, 0.0);
        let position = features[0].position();
        assert!((position.longitude - 10.0005).abs() < 1e-9);
        assert!((position.latitude - 10.0).abs() < 1e-6);
    }
}
