//! Output formatting for route and city listings.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use citymap_lib::{Cost, RoadMap, RouteRenderMode, RouteSummary};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Write a route summary to stdout.
    pub fn render_route(self, summary: &RouteSummary, mode: RouteRenderMode) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        match self {
            OutputFormat::Text => handle.write_all(summary.render(mode).as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, summary)
                    .context("failed to serialise route summary")?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }

    /// Write every city of the map, with its roads, to stdout.
    pub fn render_cities(self, map: &RoadMap) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        match self {
            OutputFormat::Text => handle.write_all(render_city_listing(map).as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, &city_entries(map))
                    .context("failed to serialise city listing")?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}

/// One city of a listing, as serialised for `--format json`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CityEntry {
    pub name: String,
    pub latitude: i64,
    pub longitude: i64,
    pub placeholder: bool,
    pub roads: Vec<RoadEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoadEntry {
    pub to: String,
    pub distance: Cost,
}

pub fn city_entries(map: &RoadMap) -> Vec<CityEntry> {
    map.cities()
        .iter()
        .map(|city| CityEntry {
            name: city.name().to_string(),
            latitude: city.latitude(),
            longitude: city.longitude(),
            placeholder: city.is_placeholder(),
            roads: city
                .neighbours()
                .iter()
                .filter_map(|road| {
                    map.city(road.city).map(|to| RoadEntry {
                        to: to.name().to_string(),
                        distance: road.distance,
                    })
                })
                .collect(),
        })
        .collect()
}

/// Text listing: one `name lat lon roads` line per city, its roads indented below.
pub fn render_city_listing(map: &RoadMap) -> String {
    let mut buffer = String::new();
    for city in map.cities() {
        buffer.push_str(&city.to_string());
        buffer.push('\n');
        for road in city.neighbours() {
            if let Some(to) = map.city(road.city) {
                buffer.push_str(&format!("    {} {}\n", to.name(), road.distance));
            }
        }
    }
    buffer
}
