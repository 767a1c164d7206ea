use thiserror::Error;

use crate::map::CityId;

/// Convenient result alias for the citymap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by [`List`](crate::list::List) operations.
///
/// Every variant is recoverable: a failed operation leaves the list exactly
/// as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// Position outside `[1, len]` (access/removal) or `[1, len + 1]` (insertion).
    #[error("position {position} is out of range for a list of length {len}")]
    IndexOutOfRange { position: usize, len: usize },

    /// Neither the pool's free cells nor its backing store could supply a cell.
    #[error("no link cell available: pool exhausted")]
    AllocationFailure,

    /// The operation needs a comparator or display function the list was built without.
    #[error("{operation} requires a {requirement} function")]
    UnsupportedOperation {
        operation: &'static str,
        requirement: &'static str,
    },

    /// Value-based removal found no element comparing equal.
    #[error("value not found in list")]
    NotFound,
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for list usage faults surfacing through the search engine.
    #[error(transparent)]
    List(#[from] ListError),

    /// Wrapper for IO errors while reading a map file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Raised when a map file line cannot be interpreted.
    #[error("map line {line}: {message}")]
    MapParse { line: usize, message: String },

    /// Raised when a city name exceeds the supported length.
    #[error("map line {line}: city name '{name}' is longer than {max} bytes")]
    CityNameTooLong {
        line: usize,
        name: String,
        max: usize,
    },

    /// Raised when a city name could not be found in the map.
    #[error("unknown city name: {name}{}", format_suggestions(.suggestions))]
    UnknownCity {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a city identifier does not belong to the map.
    #[error("city id {id} is not part of this map")]
    UnknownCityId { id: CityId },

    /// Raised when a second search is started on a map that is being searched.
    #[error("a search is already running on this map")]
    SearchInProgress,

    /// Raised when the open set empties before the goal is reached.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when a host-imposed iteration budget stops the search early.
    #[error("search stopped after {iterations} iterations without reaching {goal}")]
    SearchBudgetExhausted { goal: String, iterations: usize },

    /// Raised when the goal was reached but its predecessors loop instead of
    /// leading back to the start.
    #[error("reached {goal} but could not trace the route back to the start")]
    BrokenPredecessorChain { goal: String },

    /// Raised when a route plan lists a different number of cities and costs.
    #[error("route plan has {steps} cities but {costs} accumulated costs")]
    RoutePlanMismatch { steps: usize, costs: usize },
}

fn format_suggestions(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(". Did you mean '{}'?", only),
        many => format!(
            ". Did you mean one of: {}?",
            many.iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
