//! Cities command handler: dump the loaded road map.

use std::path::Path;

use anyhow::Result;

use citymap_cli::output::OutputFormat;

use super::route::load_map;

pub fn handle_cities_command(map_path: &Path, format: OutputFormat) -> Result<()> {
    let map = load_map(map_path)?;
    format.render_cities(&map)
}
