//! Cities, roads, and the road-map loader.
//!
//! A map file holds one record per line:
//!
//! ```text
//! Rennes 4811 -168     <- city record: name, latitude, longitude
//! Nantes 107           <- road from the last city record to Nantes, 107 long
//! ```
//!
//! Cities first seen as a road target are created with placeholder
//! coordinates and patched once their own record shows up.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Dense identifier of a city within its [`RoadMap`].
pub type CityId = usize;

/// Distances and cost estimates.
pub type Cost = i64;

/// Accumulated cost of a city the current search has not reached.
pub const UNREACHED: Cost = Cost::MAX;

/// Longest city name accepted by the loader, in bytes.
pub const MAX_CITY_NAME_LEN: usize = 19;

/// Coordinate given to cities referenced before their own record.
pub const PLACEHOLDER_COORDINATE: i64 = -1;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Road from one city to a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub city: CityId,
    pub distance: Cost,
}

/// A node of the road map.
///
/// The search bookkeeping (accumulated cost, estimate, predecessor) lives in
/// [`Cell`]s so that the map and the open/closed lists can all refer to the
/// same city while a search updates it.
#[derive(Debug, Clone)]
pub struct City {
    id: CityId,
    name: String,
    latitude: i64,
    longitude: i64,
    placeholder: bool,
    neighbours: Vec<Neighbour>,
    cost: Cell<Cost>,
    estimate: Cell<Cost>,
    predecessor: Cell<Option<CityId>>,
}

impl City {
    fn new(id: CityId, name: &str, latitude: i64, longitude: i64, placeholder: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            latitude,
            longitude,
            placeholder,
            neighbours: Vec::new(),
            cost: Cell::new(UNREACHED),
            estimate: Cell::new(0),
            predecessor: Cell::new(None),
        }
    }

    pub fn id(&self) -> CityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> i64 {
        self.latitude
    }

    pub fn longitude(&self) -> i64 {
        self.longitude
    }

    /// `true` while the city is only known as a road target.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Outgoing roads in file order.
    pub fn neighbours(&self) -> &[Neighbour] {
        &self.neighbours
    }

    /// Best known cost from the start of the current search.
    pub fn accumulated_cost(&self) -> Cost {
        self.cost.get()
    }

    /// Heuristic estimate to the goal of the current search.
    pub fn estimated_cost(&self) -> Cost {
        self.estimate.get()
    }

    /// City preceding this one on the best known path.
    pub fn predecessor(&self) -> Option<CityId> {
        self.predecessor.get()
    }

    pub(crate) fn reset_search(&self, estimate: Cost) {
        self.cost.set(UNREACHED);
        self.estimate.set(estimate);
        self.predecessor.set(None);
    }

    pub(crate) fn reach(&self, cost: Cost, predecessor: Option<CityId>) {
        self.cost.set(cost);
        self.predecessor.set(predecessor);
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.latitude,
            self.longitude,
            self.neighbours.len()
        )
    }
}

/// Display adapter for lists of city references: renders the name only.
pub fn display_city_name(city: &&City, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(city.name())
}

/// In-memory road map, unique by city name.
#[derive(Debug, Clone, Default)]
pub struct RoadMap {
    cities: Vec<City>,
    name_to_id: HashMap<String, CityId>,
    search_active: Cell<bool>,
}

impl RoadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a map from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut map = Self::new();
        let mut current: Option<CityId> = None;

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();

            match fields.as_slice() {
                [] => continue,
                [name, latitude, longitude] => {
                    check_name(name, line_no)?;
                    let latitude = parse_number(latitude, "latitude", line_no)?;
                    let longitude = parse_number(longitude, "longitude", line_no)?;
                    current = Some(map.upsert_city(name, latitude, longitude));
                }
                [name, distance] => {
                    let Some(from) = current else {
                        return Err(Error::MapParse {
                            line: line_no,
                            message: format!("road to '{name}' appears before any city record"),
                        });
                    };
                    check_name(name, line_no)?;
                    let distance = parse_number(distance, "distance", line_no)?;
                    if distance < 0 {
                        return Err(Error::MapParse {
                            line: line_no,
                            message: format!("negative distance {distance} to '{name}'"),
                        });
                    }
                    let to = map.ensure_city(name);
                    map.add_road(from, to, distance);
                }
                other => {
                    return Err(Error::MapParse {
                        line: line_no,
                        message: format!("expected 2 or 3 fields, found {}", other.len()),
                    });
                }
            }
        }

        let placeholders = map.cities.iter().filter(|c| c.is_placeholder()).count();
        if placeholders > 0 {
            warn!(
                placeholders,
                "cities referenced by roads were never defined; keeping placeholder coordinates"
            );
        }
        Ok(map)
    }

    /// Insert a city or patch the coordinates of an existing one.
    pub fn upsert_city(&mut self, name: &str, latitude: i64, longitude: i64) -> CityId {
        if let Some(&id) = self.name_to_id.get(name) {
            let city = &mut self.cities[id];
            if !city.placeholder {
                debug!(city = name, "city record repeated; updating coordinates");
            }
            city.latitude = latitude;
            city.longitude = longitude;
            city.placeholder = false;
            return id;
        }
        self.push_city(name, latitude, longitude, false)
    }

    /// Look up a city, creating a placeholder when it is unknown.
    pub fn ensure_city(&mut self, name: &str) -> CityId {
        match self.name_to_id.get(name) {
            Some(&id) => id,
            None => self.push_city(name, PLACEHOLDER_COORDINATE, PLACEHOLDER_COORDINATE, true),
        }
    }

    /// Add a one-way road. Ids not belonging to this map are ignored.
    pub fn add_road(&mut self, from: CityId, to: CityId, distance: Cost) {
        if to >= self.cities.len() {
            return;
        }
        if let Some(city) = self.cities.get_mut(from) {
            city.neighbours.push(Neighbour { city: to, distance });
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// All cities in order of first appearance.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id)
    }

    /// Lookup a city identifier by its case-sensitive name.
    pub fn city_id_by_name(&self, name: &str) -> Option<CityId> {
        self.name_to_id.get(name).copied()
    }

    pub fn city_by_name(&self, name: &str) -> Option<&City> {
        self.city_id_by_name(name).and_then(|id| self.city(id))
    }

    /// Resolve a name, suggesting close matches when it is unknown.
    pub fn resolve(&self, name: &str) -> Result<&City> {
        self.city_by_name(name).ok_or_else(|| Error::UnknownCity {
            name: name.to_string(),
            suggestions: self.suggest_names(name, 3),
        })
    }

    /// Names most similar to `name`, best first.
    pub fn suggest_names(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .cities
            .iter()
            .map(|city| {
                let score = strsim::jaro_winkler(&needle, &city.name.to_lowercase());
                (score, city.name.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Shortest direct road between two cities, if any.
    pub fn road_distance(&self, from: CityId, to: CityId) -> Option<Cost> {
        self.city(from)?
            .neighbours
            .iter()
            .filter(|road| road.city == to)
            .map(|road| road.distance)
            .min()
    }

    /// Mark the map as being searched; `false` if a search already runs.
    pub(crate) fn begin_search(&self) -> bool {
        !self.search_active.replace(true)
    }

    pub(crate) fn end_search(&self) {
        self.search_active.set(false);
    }

    fn push_city(&mut self, name: &str, latitude: i64, longitude: i64, placeholder: bool) -> CityId {
        let id = self.cities.len();
        self.cities
            .push(City::new(id, name, latitude, longitude, placeholder));
        self.name_to_id.insert(name.to_string(), id);
        id
    }
}

/// Load a road map from a file on disk.
pub fn load_road_map(path: &Path) -> Result<RoadMap> {
    let file = File::open(path)?;
    let map = RoadMap::from_reader(file)?;
    debug!(path = %path.display(), cities = map.len(), "loaded road map");
    Ok(map)
}

fn check_name(name: &str, line: usize) -> Result<()> {
    if name.len() > MAX_CITY_NAME_LEN {
        return Err(Error::CityNameTooLong {
            line,
            name: name.to_string(),
            max: MAX_CITY_NAME_LEN,
        });
    }
    Ok(())
}

fn parse_number(raw: &str, field: &str, line: usize) -> Result<i64> {
    raw.parse::<i64>().map_err(|err| Error::MapParse {
        line,
        message: format!("invalid {field} '{raw}': {err}"),
    })
}
