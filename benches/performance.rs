//! Performance benchmarks for station-flow
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use station_flow::{
    compute_stats, BBox, ClusterConfig, FlowConfig, GeoPoint, SpatialClusterIndex,
    StationSnapshot, TripSimulator,
};

/// Route library logs to stderr when RUST_LOG is set. Safe to call per group.
fn init_logging() {
    let _ = env_logger::try_init();
}

/// Generate a city-sized station network around Paris.
fn generate_stations(count: usize, seed: u64) -> Vec<StationSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let capacity = rng.gen_range(12..70);
            let mechanical = rng.gen_range(0..capacity / 2);
            let electric = rng.gen_range(0..capacity / 3);
            StationSnapshot::new(
                i.to_string(),
                format!("Station {}", i),
                GeoPoint::new(
                    48.8566 + rng.gen_range(-0.08..0.08),
                    2.3522 + rng.gen_range(-0.12..0.12),
                ),
                capacity,
                mechanical,
                electric,
                capacity - mechanical - electric,
            )
        })
        .collect()
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    init_logging();
    let mut group = c.benchmark_group("construction");
    group.sample_size(20);

    for count in [500, 1_500, 5_000] {
        let stations = generate_stations(count, 1);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &stations, |b, stations| {
            b.iter(|| SpatialClusterIndex::from_snapshots(stations, ClusterConfig::default()));
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    init_logging();
    let mut group = c.benchmark_group("query");

    let stations = generate_stations(1_500, 2);
    let index = match SpatialClusterIndex::from_snapshots(&stations, ClusterConfig::default()) {
        Ok(index) => index,
        Err(e) => panic!("index build failed: {}", e),
    };

    // Whole city at overview zoom
    let city = BBox::new(2.20, 48.77, 2.50, 48.94);
    group.bench_function("city_zoom_11", |b| {
        b.iter(|| index.query(&city, 11.0));
    });

    // Neighbourhood, raw stations
    let district = BBox::new(2.34, 48.85, 2.37, 48.87);
    group.bench_function("district_zoom_17", |b| {
        b.iter(|| index.query(&district, 17.0));
    });

    group.bench_function("world_all_zooms", |b| {
        b.iter(|| {
            (0..=17)
                .map(|z| index.query(&BBox::WORLD, z as f64).len())
                .sum::<usize>()
        });
    });

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    init_logging();
    let mut group = c.benchmark_group("simulation");

    let stations = generate_stations(1_500, 3);
    group.bench_function("one_minute_at_60fps", |b| {
        b.iter(|| {
            let mut simulator = TripSimulator::seeded(FlowConfig::default(), 7);
            simulator.set_stations(&stations);
            for frame in 0..3_600u64 {
                simulator.tick(frame * 16);
            }
            simulator.counts()
        });
    });

    group.bench_function("stats_1500", |b| {
        b.iter(|| compute_stats(&stations));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_construction, bench_query, bench_simulation);

criterion_main!(benches);
