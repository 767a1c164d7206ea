// Test-only helpers for `citymap-lib` tests
use std::path::PathBuf;

use crate::map::{load_road_map, Cost, RoadMap};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/france.map")
}

/// The France fixture map.
pub fn fixture_map() -> RoadMap {
    load_road_map(&fixture_path()).expect("fixture loads")
}

/// Two-way roads between cities sharing one location, so every heuristic
/// estimate is zero. Cities get ids in order of first mention.
pub fn flat_map(roads: &[(&str, &str, Cost)]) -> RoadMap {
    let mut map = RoadMap::new();
    for &(from, to, distance) in roads {
        let from = map.upsert_city(from, 0, 0);
        let to = map.upsert_city(to, 0, 0);
        map.add_road(from, to, distance);
        map.add_road(to, from, distance);
    }
    map
}
