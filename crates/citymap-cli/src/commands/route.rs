//! Route command handler for computing paths between cities.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use citymap_lib::{
    load_road_map, plan_route, Error as RouteError, Relaxation, RoadMap, RouteRenderMode,
    RouteRequest, RouteSummary,
};
use citymap_cli::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting city name.
    pub from: String,
    /// Destination city name.
    pub to: String,
    pub relaxation: Relaxation,
    /// Iteration budget for the search loop.
    pub max_iterations: Option<usize>,
    /// Print the route from the destination back to the start.
    pub reverse: bool,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(&self.from, &self.to)
            .with_relaxation(self.relaxation)
            .with_max_iterations(self.max_iterations)
    }
}

pub fn load_map(path: &Path) -> Result<RoadMap> {
    let map = load_road_map(path)
        .with_context(|| format!("failed to load road map from {}", path.display()))?;
    debug!(cities = map.len(), "road map ready");
    Ok(map)
}

/// Handle the route subcommand.
pub fn handle_route_command(
    map_path: &Path,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let map = load_map(map_path)?;
    let request = args.to_request();

    let plan = match plan_route(&map, &request) {
        Ok(plan) => plan,
        Err(err) => return Err(handle_route_failure(err)),
    };

    let summary = RouteSummary::from_plan(&map, &plan)
        .context("failed to build route summary for display")?;
    let mode = if args.reverse {
        RouteRenderMode::Reverse
    } else {
        RouteRenderMode::Forward
    };
    format.render_route(&summary, mode)
}

fn handle_route_failure(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownCity { name, suggestions } => {
            anyhow::anyhow!(format_unknown_city_message(&name, &suggestions))
        }
        RouteError::RouteNotFound { start, goal } => {
            anyhow::anyhow!("No route found between {} and {}.", start, goal)
        }
        RouteError::SearchBudgetExhausted { goal, iterations } => anyhow::anyhow!(
            "Search stopped after {} iterations without reaching {}. Try a larger --max-iterations.",
            iterations,
            goal
        ),
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_city_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown city '{}'.", name);
    let formatted = match suggestions {
        [] => return message,
        [only] => format!("Did you mean '{only}'?"),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Did you mean one of: {}?", joined)
        }
    };
    message.push(' ');
    message.push_str(&formatted);
    message
}
