//! Cluster a synthetic station network and walk through the zoom levels.
//!
//! Run with: RUST_LOG=info cargo run --example cluster_viewport

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use station_flow::{
    cluster_color, cluster_radius, format_count, station_heatmap, BBox, ClusterConfig,
    ClusterFeature, GeoPoint, HeatmapStyle, SpatialClusterIndex, StationSnapshot, Viewport,
};

/// Stations scattered around central Paris.
fn paris_network(count: usize, seed: u64) -> Vec<StationSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let lat = 48.8566 + rng.gen_range(-0.06..0.06);
            let lng = 2.3522 + rng.gen_range(-0.10..0.10);
            let capacity = rng.gen_range(15..60);
            let mechanical = rng.gen_range(0..capacity / 2);
            let electric = rng.gen_range(0..capacity / 3);
            StationSnapshot::new(
                format!("{}", 10_000 + i),
                format!("Station {}", i),
                GeoPoint::new(lat, lng),
                capacity,
                mechanical,
                electric,
                capacity - mechanical - electric,
            )
        })
        .collect()
}

fn main() {
    env_logger::init();

    let stations = paris_network(1_500, 42);
    let index = match SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Failed to build index: {}", e);
            return;
        }
    };

    println!("Station Clustering\n");
    println!("{} stations indexed, max zoom {}\n", index.len(), index.max_zoom());

    let paris = BBox::new(2.22, 48.80, 2.47, 48.91);
    for zoom in [9.0, 11.0, 12.5, 14.0, 16.0, 17.0] {
        let features = index.query_viewport(&Viewport::new(paris, zoom));
        let clusters = features.iter().filter(|f| f.is_cluster()).count();
        let bikes: u64 = features.iter().map(|f| f.metrics().total_bikes).sum();
        println!(
            "zoom {:>4}: {:>5} features ({} clusters), {} bikes",
            zoom,
            features.len(),
            clusters,
            format_count(bikes)
        );
    }

    // Drill into the biggest cluster at zoom 12
    let features = index.query(&paris, 12.0);
    let biggest = features
        .iter()
        .filter_map(|f| match f {
            ClusterFeature::Aggregate { id, point_count, metrics, .. } => {
                Some((*id, *point_count, *metrics))
            }
            ClusterFeature::Point(_) => None,
        })
        .max_by_key(|(_, count, _)| *count);

    if let Some((id, count, metrics)) = biggest {
        println!("\nLargest cluster at zoom 12: {} ({} stations)", id, count);
        println!(
            "   colour {}  radius {:.1}px  bikes {}/{}",
            cluster_color(metrics.total_bikes, metrics.capacity).to_hex(),
            cluster_radius(count),
            metrics.total_bikes,
            metrics.capacity
        );
        match index.expansion_zoom(id) {
            Ok(zoom) => println!("   expands at zoom {}", zoom),
            Err(e) => println!("   {}", e),
        }
        if let Ok(children) = index.children(id) {
            println!("   splits into {} features", children.len());
        }
        if let Ok(leaves) = index.leaves(id, 3, 0) {
            for leaf in leaves {
                println!("   - {} ({} bikes)", leaf.name, leaf.metrics.total_bikes);
            }
        }
    }

    let heat = station_heatmap(&stations);
    let style = HeatmapStyle::at_zoom(13.0);
    println!(
        "\nHeatmap: {} points, intensity {:.2}, radius {:.0}px, opacity {:.3}",
        heat.len(),
        style.intensity,
        style.radius,
        style.opacity
    );
}
