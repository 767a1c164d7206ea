//! A* best-first search over a [`RoadMap`].
//!
//! The open set is a [`List`] kept sorted by total estimated cost and the
//! closed set a [`List`] keyed by city name. Both hold references to the
//! map's cities; the engine updates costs and predecessors through them.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cost::{compare_by_name, compare_by_total_cost, heuristic};
use crate::error::{Error, Result};
use crate::list::List;
use crate::map::{display_city_name, City, CityId, Cost, RoadMap};
use crate::pool::{CellPool, SharedPool};

/// How a successor's cost is relaxed when a new path to it is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relaxation {
    /// A successor already in the open set is never updated, even when the
    /// new path is cheaper. Open membership uses the open set's own order,
    /// so any pending city with the same total estimated cost counts.
    /// A closed successor is reopened unless the new path is strictly worse.
    #[default]
    AsObserved,
    /// Textbook A*: a successor pending in the open set is re-queued, and a
    /// closed one reopened, only when the new path is strictly cheaper.
    Canonical,
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Relaxation::AsObserved => "as_observed",
            Relaxation::Canonical => "canonical",
        };
        f.write_str(value)
    }
}

/// Tunables for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub relaxation: Relaxation,
    /// Stop after this many iterations of the expansion loop.
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Initialized,
    Expanding,
    Succeeded,
    Failed,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Succeeded | SearchState::Failed)
    }
}

/// Route found by a successful search, start first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub cities: Vec<CityId>,
    /// Accumulated cost at each city of `cities`; the last entry is `cost`.
    pub costs: Vec<Cost>,
    pub cost: Cost,
}

impl Path {
    /// Number of roads travelled.
    pub fn hop_count(&self) -> usize {
        self.cities.len().saturating_sub(1)
    }

    /// Cities from the goal back to the start.
    pub fn reversed(&self) -> Vec<CityId> {
        self.cities.iter().rev().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    /// The open set emptied before the goal was popped.
    Exhausted,
    /// The iteration budget ran out first.
    BudgetExhausted { iterations: usize },
}

/// One A* run. Holds the map's search flag until dropped.
pub struct AStar<'a> {
    map: &'a RoadMap,
    start: &'a City,
    goal: &'a City,
    open: List<&'a City>,
    closed: List<&'a City>,
    config: SearchConfig,
    state: SearchState,
    iterations: usize,
}

impl<'a> AStar<'a> {
    /// Initialize a search drawing list cells from a private pool.
    pub fn new(map: &'a RoadMap, start: CityId, goal: CityId, config: SearchConfig) -> Result<Self> {
        Self::with_pool(map, start, goal, &CellPool::shared(), config)
    }

    /// Initialize a search whose open and closed lists use `pool`.
    pub fn with_pool(
        map: &'a RoadMap,
        start: CityId,
        goal: CityId,
        pool: &SharedPool<&'a City>,
        config: SearchConfig,
    ) -> Result<Self> {
        let start = map.city(start).ok_or(Error::UnknownCityId { id: start })?;
        let goal = map.city(goal).ok_or(Error::UnknownCityId { id: goal })?;
        if !map.begin_search() {
            return Err(Error::SearchInProgress);
        }

        let mut search = Self {
            map,
            start,
            goal,
            open: List::sorted(pool, |a, b| compare_by_total_cost(a, b))
                .with_display(display_city_name),
            closed: List::sorted(pool, |a, b| compare_by_name(a, b))
                .with_display(display_city_name),
            config,
            state: SearchState::Initialized,
            iterations: 0,
        };

        for city in map.cities() {
            city.reset_search(heuristic(city, goal));
        }
        start.reach(0, None);
        search.open.insert_sorted(start)?;

        debug!(
            start = start.name(),
            goal = goal.name(),
            relaxation = %config.relaxation,
            "search initialized"
        );
        Ok(search)
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Iterations of the expansion loop so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn open(&self) -> &List<&'a City> {
        &self.open
    }

    pub fn closed(&self) -> &List<&'a City> {
        &self.closed
    }

    /// Run the expansion loop until it terminates or the budget runs out.
    pub fn run(&mut self) -> Result<SearchOutcome> {
        loop {
            if !self.state.is_terminal() {
                if let Some(budget) = self.config.max_iterations {
                    if self.iterations >= budget {
                        info!(iterations = self.iterations, "search budget exhausted");
                        return Ok(SearchOutcome::BudgetExhausted {
                            iterations: self.iterations,
                        });
                    }
                }
            }

            match self.step()? {
                SearchState::Succeeded => {
                    return match self.path() {
                        Some(path) => Ok(SearchOutcome::Found(path)),
                        None => {
                            warn!(
                                goal = self.goal.name(),
                                "goal reached but its predecessors do not lead back to the start"
                            );
                            Err(Error::BrokenPredecessorChain {
                                goal: self.goal.name().to_string(),
                            })
                        }
                    };
                }
                SearchState::Failed => return Ok(SearchOutcome::Exhausted),
                SearchState::Initialized | SearchState::Expanding => {}
            }
        }
    }

    /// Perform one iteration of the expansion loop.
    pub fn step(&mut self) -> Result<SearchState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        self.state = SearchState::Expanding;
        self.iterations += 1;

        if self.open.is_empty() {
            info!(
                goal = self.goal.name(),
                iterations = self.iterations,
                "open set exhausted"
            );
            self.state = SearchState::Failed;
            return Ok(self.state);
        }

        let current = self.open.remove_at(1)?;
        self.closed.insert_sorted(current)?;

        if current.id() == self.goal.id() {
            info!(
                goal = current.name(),
                cost = current.accumulated_cost(),
                iterations = self.iterations,
                "goal reached"
            );
            self.state = SearchState::Succeeded;
            return Ok(self.state);
        }

        debug!(
            city = current.name(),
            cost = current.accumulated_cost(),
            open = self.open.len(),
            closed = self.closed.len(),
            "expanding"
        );

        for road in current.neighbours() {
            let Some(successor) = self.map.city(road.city) else {
                continue;
            };
            let tentative = current.accumulated_cost().saturating_add(road.distance);
            match self.config.relaxation {
                Relaxation::AsObserved => self.relax_as_observed(current, successor, tentative)?,
                Relaxation::Canonical => self.relax_canonical(current, successor, tentative)?,
            }
        }
        Ok(self.state)
    }

    /// Walk predecessors back from the goal. `None` until the search succeeds.
    pub fn path(&self) -> Option<Path> {
        if self.state != SearchState::Succeeded {
            return None;
        }

        let mut cities = vec![self.goal.id()];
        let mut costs = vec![self.goal.accumulated_cost()];
        let mut current = self.goal;
        while current.id() != self.start.id() {
            let previous = self.map.city(current.predecessor()?)?;
            cities.push(previous.id());
            costs.push(previous.accumulated_cost());
            if cities.len() > self.map.len() {
                // predecessor cycle; only possible with zero-length roads
                return None;
            }
            current = previous;
        }
        cities.reverse();
        costs.reverse();

        Some(Path {
            cities,
            costs,
            cost: self.goal.accumulated_cost(),
        })
    }

    fn relax_as_observed(&mut self, current: &'a City, successor: &'a City, tentative: Cost) -> Result<()> {
        let in_open = self.open.contains(&successor)?;
        let in_closed = self.closed.contains(&successor)?;
        if in_open.is_present()
            || (in_closed.is_present() && tentative > successor.accumulated_cost())
        {
            return Ok(());
        }

        if in_closed.is_present() {
            self.closed.remove_found(in_closed)?;
        }
        successor.reach(tentative, Some(current.id()));
        self.open.insert_sorted(successor)?;
        Ok(())
    }

    fn relax_canonical(&mut self, current: &'a City, successor: &'a City, tentative: Cost) -> Result<()> {
        if tentative >= successor.accumulated_cost() {
            return Ok(());
        }

        if let Some(position) = self.open.position(|city| city.id() == successor.id()) {
            self.open.remove_at(position)?;
        } else {
            let in_closed = self.closed.contains(&successor)?;
            if in_closed.is_present() {
                self.closed.remove_found(in_closed)?;
            }
        }
        successor.reach(tentative, Some(current.id()));
        self.open.insert_sorted(successor)?;
        Ok(())
    }
}

impl Drop for AStar<'_> {
    fn drop(&mut self) {
        self.map.end_search();
    }
}

impl fmt::Debug for AStar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.open.display().map(|d| d.to_string()).unwrap_or_default();
        let closed = self.closed.display().map(|d| d.to_string()).unwrap_or_default();
        f.debug_struct("AStar")
            .field("start", &self.start.name())
            .field("goal", &self.goal.name())
            .field("state", &self.state)
            .field("iterations", &self.iterations)
            .field("open", &open)
            .field("closed", &closed)
            .finish()
    }
}
