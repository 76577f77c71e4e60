//! Drive the trip simulator and renderer headlessly for a few seconds.
//!
//! Run with: RUST_LOG=debug cargo run --example flow_simulation

use station_flow::{
    compute_stats, DisplayList, FlowConfig, FlowLayer, FlowRenderer, GeoPoint, MapHost,
    ScreenPoint, StationSnapshot, TrailConfig, TripSimulator,
};

/// Equirectangular projection of a 1280x800 view over Paris.
struct HeadlessMap {
    center: GeoPoint,
    pixels_per_degree: f64,
}

impl MapHost for HeadlessMap {
    type Surface = DisplayList;

    fn project(&self, point: &GeoPoint) -> ScreenPoint {
        ScreenPoint::new(
            640.0 + (point.longitude - self.center.longitude) * self.pixels_per_degree,
            400.0 - (point.latitude - self.center.latitude) * self.pixels_per_degree,
        )
    }

    fn viewport_size(&self) -> (f64, f64) {
        (1280.0, 800.0)
    }

    fn device_pixel_ratio(&self) -> f64 {
        2.0
    }

    fn create_surface(&mut self) -> Option<DisplayList> {
        Some(DisplayList::new())
    }

    fn release_surface(&mut self, _surface: DisplayList) {}
}

fn grid_stations() -> Vec<StationSnapshot> {
    let mut stations = Vec::new();
    for row in 0..12 {
        for col in 0..12 {
            let i = row * 12 + col;
            let mechanical = (i * 7 % 13) as u32;
            let electric = (i * 5 % 9) as u32;
            let docks = (i * 3 % 17) as u32;
            stations.push(StationSnapshot::new(
                format!("{}", i),
                format!("Grid {}-{}", row, col),
                GeoPoint::new(48.82 + row as f64 * 0.006, 2.29 + col as f64 * 0.009),
                mechanical + electric + docks,
                mechanical,
                electric,
                docks,
            ));
        }
    }
    stations
}

fn main() {
    env_logger::init();

    let stations = grid_stations();
    let stats = compute_stats(&stations);
    println!("Trip Flow Simulation\n");
    println!(
        "{} stations, {} bikes ({} electric), {} free docks\n",
        stats.active_stations, stats.total_bikes, stats.electric_bikes, stats.available_docks
    );

    let mut map = HeadlessMap {
        center: GeoPoint::new(48.853, 2.34),
        pixels_per_degree: 12_000.0,
    };

    let mut simulator = TripSimulator::seeded(FlowConfig::default(), 2024);
    simulator.set_stations(&stations);
    let mut layer = FlowLayer::new(simulator, FlowRenderer::new(TrailConfig::default()));
    layer.attach(&mut map);

    // 60 fps for 20 simulated seconds
    let frame_ms = 16;
    for frame in 0..(20 * 60) {
        let now = frame * frame_ms;
        layer.on_frame(now, &map);

        if frame % 120 == 0 {
            let counts = layer.simulator().counts();
            let commands = layer
                .renderer()
                .surface()
                .map(|s| s.commands().len())
                .unwrap_or(0);
            println!(
                "t={:>5}ms  trips {:>3} ({} electric, {} mechanical)  draw calls {}",
                now, counts.active, counts.electric, counts.mechanical, commands
            );
        }
    }

    if let Some(trip) = layer.simulator().trips().first() {
        println!(
            "\n{}: {} -> {} at {:.0}%",
            trip.id,
            trip.origin.name,
            trip.destination.name,
            trip.progress * 100.0
        );
    }

    layer.simulator_mut().set_enabled(false);
    println!("\nDisabled: {} trips left", layer.on_frame(20_000, &map));
    layer.detach(&mut map);
}
