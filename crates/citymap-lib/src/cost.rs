//! Cost functions and the orderings used to configure open/closed lists.

use std::cmp::Ordering;

use crate::map::{City, Cost};

/// Manhattan distance in coordinate units, scaled down by four.
///
/// Whether this is admissible depends on how the map's coordinates relate to
/// its road lengths; nothing here checks it. Saturates for coordinates far
/// enough apart to overflow.
pub fn heuristic(city: &City, goal: &City) -> Cost {
    let lat = city.latitude().abs_diff(goal.latitude());
    let lon = city.longitude().abs_diff(goal.longitude());
    Cost::try_from(lat.saturating_add(lon) / 4).unwrap_or(Cost::MAX)
}

/// Cost from the start along the best path found so far.
pub fn accumulated_cost(city: &City) -> Cost {
    city.accumulated_cost()
}

/// Accumulated cost plus the estimate to the current goal.
///
/// Saturates, so unreached cities rank after every reached one.
pub fn total_estimated_cost(city: &City) -> Cost {
    city.accumulated_cost().saturating_add(city.estimated_cost())
}

pub fn compare_by_total_cost(a: &City, b: &City) -> Ordering {
    total_estimated_cost(a).cmp(&total_estimated_cost(b))
}

pub fn compare_by_accumulated_cost(a: &City, b: &City) -> Ordering {
    accumulated_cost(a).cmp(&accumulated_cost(b))
}

/// Identity order: names are unique within a map.
pub fn compare_by_name(a: &City, b: &City) -> Ordering {
    a.name().cmp(b.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{RoadMap, UNREACHED};

    fn two_cities() -> RoadMap {
        let mut map = RoadMap::new();
        map.upsert_city("Rennes", 4811, -168);
        map.upsert_city("Lyon", 4576, 483);
        map
    }

    #[test]
    fn heuristic_truncates_quarter_manhattan_distance() {
        let map = two_cities();
        let rennes = map.city_by_name("Rennes").unwrap();
        let lyon = map.city_by_name("Lyon").unwrap();

        // (235 + 651) / 4 = 221.5
        assert_eq!(heuristic(rennes, lyon), 221);
        assert_eq!(heuristic(lyon, rennes), 221);
        assert_eq!(heuristic(lyon, lyon), 0);
    }

    #[test]
    fn heuristic_survives_extreme_coordinates() {
        let mut map = RoadMap::new();
        map.upsert_city("North", i64::MAX, i64::MAX);
        map.upsert_city("South", i64::MIN, i64::MIN);
        let north = map.city_by_name("North").unwrap();
        let south = map.city_by_name("South").unwrap();

        // 2 * u64::MAX saturates to u64::MAX before the division
        assert_eq!(heuristic(north, south), (u64::MAX / 4) as Cost);
        assert_eq!(heuristic(south, north), heuristic(north, south));
        assert_eq!(heuristic(north, north), 0);
    }

    #[test]
    fn total_cost_saturates_for_unreached_cities() {
        let map = two_cities();
        let rennes = map.city_by_name("Rennes").unwrap();
        let lyon = map.city_by_name("Lyon").unwrap();
        rennes.reset_search(heuristic(rennes, lyon));
        lyon.reset_search(0);

        assert_eq!(total_estimated_cost(rennes), UNREACHED);
        rennes.reach(10, None);
        assert_eq!(total_estimated_cost(rennes), 231);
        assert_eq!(compare_by_total_cost(rennes, lyon), Ordering::Less);
    }

    #[test]
    fn comparators_order_by_their_key() {
        let map = two_cities();
        let rennes = map.city_by_name("Rennes").unwrap();
        let lyon = map.city_by_name("Lyon").unwrap();
        rennes.reset_search(0);
        lyon.reset_search(0);
        rennes.reach(5, None);
        lyon.reach(7, None);

        assert_eq!(compare_by_accumulated_cost(rennes, lyon), Ordering::Less);
        assert_eq!(compare_by_name(rennes, lyon), Ordering::Greater);
        assert_eq!(compare_by_name(lyon, lyon), Ordering::Equal);
    }
}
