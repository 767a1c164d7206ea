use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::map::{CityId, Cost, RoadMap};
use crate::routing::RoutePlan;
use crate::search::Relaxation;

/// Direction in which a [`RouteSummary`] is rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRenderMode {
    /// One numbered line per city, start first.
    #[default]
    Forward,
    /// A single line from the goal back to the start.
    Reverse,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteEndpoint {
    pub id: CityId,
    pub name: String,
}

/// City visited along a planned route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteStep {
    pub index: usize,
    pub id: CityId,
    pub name: String,
    /// Length of the road leading here; absent for the start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Cost>,
    pub cumulative: Cost,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub relaxation: Relaxation,
    pub hops: usize,
    pub cost: Cost,
    pub iterations: usize,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with resolved names and per-road distances.
    ///
    /// Distances are taken from the plan's accumulated costs, so they describe
    /// the roads the search actually relaxed even when parallel roads exist.
    pub fn from_plan(map: &RoadMap, plan: &RoutePlan) -> Result<Self> {
        if plan.steps.len() != plan.step_costs.len() {
            return Err(Error::RoutePlanMismatch {
                steps: plan.steps.len(),
                costs: plan.step_costs.len(),
            });
        }

        let mut steps = Vec::with_capacity(plan.steps.len());
        let mut previous: Option<Cost> = None;

        for (index, (&id, &cumulative)) in plan.steps.iter().zip(&plan.step_costs).enumerate() {
            let city = map.city(id).ok_or(Error::UnknownCityId { id })?;
            steps.push(RouteStep {
                index,
                id,
                name: city.name().to_string(),
                distance: previous.map(|before| cumulative.saturating_sub(before)),
                cumulative,
            });
            previous = Some(cumulative);
        }

        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Err(Error::RouteNotFound {
                start: endpoint_name(map, plan.start),
                goal: endpoint_name(map, plan.goal),
            });
        };
        let start = RouteEndpoint {
            id: first.id,
            name: first.name.clone(),
        };
        let goal = RouteEndpoint {
            id: last.id,
            name: last.name.clone(),
        };

        Ok(Self {
            relaxation: plan.relaxation,
            hops: plan.hop_count(),
            cost: plan.cost,
            iterations: plan.iterations,
            start,
            goal,
            steps,
        })
    }

    /// Render the summary as plain text.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        let mut buffer = String::new();
        match mode {
            RouteRenderMode::Forward => {
                let _ = writeln!(
                    buffer,
                    "Route: {} -> {} ({} hops, cost {}, relaxation: {})",
                    self.start.name, self.goal.name, self.hops, self.cost, self.relaxation
                );
                for step in &self.steps {
                    match step.distance {
                        Some(distance) => {
                            let _ = writeln!(
                                buffer,
                                "{:>3}: {} (+{}, {})",
                                step.index, step.name, distance, step.cumulative
                            );
                        }
                        None => {
                            let _ = writeln!(buffer, "{:>3}: {}", step.index, step.name);
                        }
                    }
                }
            }
            RouteRenderMode::Reverse => {
                let _ = writeln!(
                    buffer,
                    "Route: {} <- {} ({} hops, cost {}, relaxation: {})",
                    self.goal.name, self.start.name, self.hops, self.cost, self.relaxation
                );
                let joined = self
                    .steps
                    .iter()
                    .rev()
                    .map(|step| step.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" <- ");
                let _ = writeln!(buffer, "{joined}");
            }
        }
        buffer
    }
}

fn endpoint_name(map: &RoadMap, id: CityId) -> String {
    map.city(id)
        .map(|city| city.name().to_string())
        .unwrap_or_else(|| format!("#{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{plan_route, RouteRequest};
    use crate::test_helpers::fixture_map;

    fn summary() -> RouteSummary {
        let map = fixture_map();
        let plan = plan_route(&map, &RouteRequest::new("Rennes", "Lyon")).unwrap();
        RouteSummary::from_plan(&map, &plan).unwrap()
    }

    #[test]
    fn steps_carry_road_distances() {
        let summary = summary();
        let distances: Vec<Option<Cost>> = summary.steps.iter().map(|s| s.distance).collect();
        assert_eq!(
            distances,
            vec![None, Some(107), Some(329), Some(177), Some(165)]
        );
        assert_eq!(summary.steps.last().map(|s| s.cumulative), Some(summary.cost));
        assert_eq!(summary.start.name, "Rennes");
        assert_eq!(summary.goal.name, "Lyon");
    }

    #[test]
    fn forward_rendering_lists_each_city() {
        let text = summary().render(RouteRenderMode::Forward);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Route: Rennes -> Lyon (4 hops, cost 778, relaxation: as_observed)"
        );
        assert_eq!(lines[1], "  0: Rennes");
        assert_eq!(lines[2], "  1: Nantes (+107, 107)");
        assert_eq!(lines[5], "  4: Lyon (+165, 778)");
    }

    #[test]
    fn reverse_rendering_walks_back_from_goal() {
        let text = summary().render(RouteRenderMode::Reverse);
        assert!(text.ends_with("Lyon <- Clermont-Ferrand <- Limoges <- Nantes <- Rennes\n"));
    }

    #[test]
    fn empty_plan_is_rejected() {
        let map = fixture_map();
        let plan = RoutePlan {
            relaxation: Relaxation::AsObserved,
            start: 0,
            goal: 1,
            steps: vec![],
            step_costs: vec![],
            cost: 0,
            iterations: 0,
        };
        assert!(matches!(
            RouteSummary::from_plan(&map, &plan),
            Err(Error::RouteNotFound { .. })
        ));
    }

    #[test]
    fn plan_with_missing_costs_is_rejected() {
        let map = fixture_map();
        let plan = RoutePlan {
            relaxation: Relaxation::AsObserved,
            start: 0,
            goal: 1,
            steps: vec![0, 1],
            step_costs: vec![0],
            cost: 0,
            iterations: 0,
        };
        assert!(matches!(
            RouteSummary::from_plan(&map, &plan),
            Err(Error::RoutePlanMismatch { steps: 2, costs: 1 })
        ));
    }

    #[test]
    fn parallel_roads_report_the_road_the_search_took() {
        let map = RoadMap::from_reader("A 0 0\nB 10\nB 5\nB 0 0\n".as_bytes()).unwrap();

        let plan = plan_route(&map, &RouteRequest::new("A", "B")).unwrap();
        let summary = RouteSummary::from_plan(&map, &plan).unwrap();
        assert_eq!(summary.cost, 10);
        assert_eq!(summary.steps[1].distance, Some(10));
        assert_eq!(summary.steps[1].cumulative, summary.cost);

        let request = RouteRequest::new("A", "B").with_relaxation(Relaxation::Canonical);
        let plan = plan_route(&map, &request).unwrap();
        let summary = RouteSummary::from_plan(&map, &plan).unwrap();
        assert_eq!(summary.cost, 5);
        assert_eq!(summary.steps[1].distance, Some(5));
        assert_eq!(summary.steps[1].cumulative, 5);
    }
}
