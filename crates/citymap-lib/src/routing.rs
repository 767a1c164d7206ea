use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::map::{CityId, Cost, RoadMap};
use crate::search::{AStar, Relaxation, SearchConfig, SearchOutcome};

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub config: SearchConfig,
}

impl RouteRequest {
    /// Request a route with the default search configuration.
    pub fn new(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            config: SearchConfig::default(),
        }
    }

    pub fn with_relaxation(mut self, relaxation: Relaxation) -> Self {
        self.config.relaxation = relaxation;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub relaxation: Relaxation,
    pub start: CityId,
    pub goal: CityId,
    pub steps: Vec<CityId>,
    /// Accumulated cost on arrival at each city of `steps`.
    pub step_costs: Vec<Cost>,
    pub cost: Cost,
    pub iterations: usize,
}

impl RoutePlan {
    /// Number of roads in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Resolve the request's city names and run A* between them.
pub fn plan_route(map: &RoadMap, request: &RouteRequest) -> Result<RoutePlan> {
    let start = map.resolve(&request.start)?.id();
    let goal = map.resolve(&request.goal)?.id();

    let mut search = AStar::new(map, start, goal, request.config)?;
    let outcome = search.run()?;
    let iterations = search.iterations();
    debug!(
        start = %request.start,
        goal = %request.goal,
        iterations,
        "route search finished"
    );

    match outcome {
        SearchOutcome::Found(path) => Ok(RoutePlan {
            relaxation: request.config.relaxation,
            start,
            goal,
            steps: path.cities,
            step_costs: path.costs,
            cost: path.cost,
            iterations,
        }),
        SearchOutcome::Exhausted => Err(Error::RouteNotFound {
            start: request.start.clone(),
            goal: request.goal.clone(),
        }),
        SearchOutcome::BudgetExhausted { iterations } => Err(Error::SearchBudgetExhausted {
            goal: request.goal.clone(),
            iterations,
        }),
    }
}
