//! Decode a pair of GBFS documents and summarise the merged fleet.
//!
//! Run with: RUST_LOG=info cargo run --example gbfs_merge --features feed

use station_flow::feed::{parse_station_information, parse_station_status, StationInfoCache};
use station_flow::{availability_color, compute_stats, merge_feeds, Result};

const STATION_INFORMATION: &str = r#"{
  "lastUpdatedOther": 1700000000,
  "ttl": 3600,
  "data": {"stations": [
    {"station_id": 213688169, "name": "Benjamin Godard - Victor Hugo", "lat": 48.8659, "lon": 2.2753, "capacity": 35, "stationCode": "16107"},
    {"station_id": 36255, "name": "Toudouze - Clauzel", "lat": 48.8792, "lon": 2.3372, "capacity": 21, "stationCode": "9020"},
    {"station_id": 37815204, "name": "Mairie du 12eme", "lat": 48.8406, "lon": 2.3877, "capacity": 30, "stationCode": "12109"}
  ]}
}"#;

const STATION_STATUS: &str = r#"{
  "data": {"stations": [
    {"station_id": 213688169, "num_bikes_available": 5, "num_bikes_available_types": [{"mechanical": 3}, {"ebike": 2}],
     "num_docks_available": 30, "is_installed": 1, "is_returning": 1, "is_renting": 1, "last_reported": 1700000120},
    {"station_id": 36255, "num_bikes_available": 14, "num_bikes_available_types": [{"mechanical": 9}, {"ebike": 5}],
     "num_docks_available": 7, "is_installed": 1, "is_returning": 1, "is_renting": 1, "last_reported": 1700000090},
    {"station_id": 37815204, "num_bikes_available": 0, "num_bikes_available_types": [{"mechanical": 0}, {"ebike": 0}],
     "num_docks_available": 0, "is_installed": 0, "is_returning": 0, "is_renting": 0, "last_reported": 1699990000}
  ]}
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let now_ms = 1_700_000_200_000;
    let mut cache = StationInfoCache::default();
    let infos = cache.store(now_ms, parse_station_information(STATION_INFORMATION)?);
    let stations = merge_feeds(infos, &parse_station_status(STATION_STATUS)?);

    println!("GBFS Merge\n");
    for station in &stations {
        println!(
            "{:<32} {:>2} bikes ({} e) {:>2} docks  {}",
            station.name,
            station.total_bikes(),
            station.electric_bikes,
            station.available_docks,
            availability_color(station.availability_ratio()).to_hex()
        );
    }

    // Static info is reused until the TTL runs out
    let later = now_ms + 60_000;
    println!(
        "\nStation info cached: {} (still fresh a minute later: {})",
        cache.get_stale().map(|m| m.len()).unwrap_or(0),
        cache.get(later).is_some()
    );

    let stats = compute_stats(&stations);
    println!(
        "{}/{} stations active, {} bikes, availability {:.0}%, last report {:?}",
        stats.active_stations,
        stats.total_stations,
        stats.total_bikes,
        stats.average_availability * 100.0,
        stats.last_updated
    );
    Ok(())
}
