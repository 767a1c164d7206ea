//! Citymap library entry points.
//!
//! This crate provides a generic singly-linked list whose cells are recycled
//! through a shared pool, a road-map model loaded from plain-text map files,
//! and an A* search over that map built on top of the list. Higher-level
//! consumers (the CLI) should only depend on the items exported here.
//!

#![deny(warnings)]

pub mod cost;
pub mod error;
pub mod list;
pub mod map;
pub mod output;
pub mod pool;
pub mod routing;
pub mod search;

#[cfg(test)]
mod test_helpers;

pub use error::{Error, ListError, Result};
pub use list::{List, Membership};
pub use map::{load_road_map, City, CityId, Cost, Neighbour, RoadMap};
pub use output::{RouteRenderMode, RouteSummary};
pub use pool::{CellId, CellPool, PoolStats, SharedPool};
pub use routing::{plan_route, RoutePlan, RouteRequest};
pub use search::{AStar, Relaxation, SearchConfig, SearchOutcome, SearchState};
