//! Configuration for arrival resolution and ranking.

use std::str::FromStr;

/// Hard cap on the number of trains shown.
pub const MAX_RESULTS_CAP: usize = 5;

/// How departures are requested from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureQuery {
    /// Ask upstream to filter to trains calling at the destination.
    Filtered,
    /// Fetch the whole origin board and filter by destination here.
    Downstream,
    /// Union of both. Upstream filtering can miss trains and the local
    /// filter only sees where a train terminates, so each catches what
    /// the other drops.
    Hybrid,
}

/// Where arrival predictions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalSource {
    /// One arrivals board at the destination, filtered from the origin.
    Board,
    /// One service detail lookup per candidate departure.
    ServiceDetails,
}

/// Error returned when parsing a data-source name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for DepartureQuery {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filtered" => Ok(DepartureQuery::Filtered),
            "downstream" => Ok(DepartureQuery::Downstream),
            "hybrid" => Ok(DepartureQuery::Hybrid),
            _ => Err(UnknownVariant {
                kind: "departure query",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ArrivalSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "board" => Ok(ArrivalSource::Board),
            "details" | "service-details" => Ok(ArrivalSource::ServiceDetails),
            _ => Err(UnknownVariant {
                kind: "arrival source",
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration parameters for one refresh cycle.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many raw departures to consider, in board order.
    /// Routes that need more disambiguation want a wider window (~20).
    candidate_window: usize,

    /// Number of trains to return (1 to `MAX_RESULTS_CAP`).
    max_results: usize,

    /// How far in the past a departure may be and still be shown (seconds).
    /// Tolerates small clock skew between us and the API.
    pub stale_tolerance_secs: i64,

    /// Added to an estimated arrival when ranking, so estimates never beat a
    /// confirmed arrival at the same time.
    pub estimate_penalty_secs: i64,

    pub departure_query: DepartureQuery,

    pub arrival_source: ArrivalSource,
}

impl EngineConfig {
    /// How many raw departures a cycle looks at. Always at least one.
    pub fn candidate_window(&self) -> usize {
        self.candidate_window.max(1)
    }

    /// How many trains a cycle returns, within `1..=MAX_RESULTS_CAP`.
    pub fn max_results(&self) -> usize {
        self.max_results.clamp(1, MAX_RESULTS_CAP)
    }

    pub fn with_candidate_window(mut self, n: usize) -> Self {
        self.candidate_window = n.max(1);
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n.clamp(1, MAX_RESULTS_CAP);
        self
    }

    pub fn with_departure_query(mut self, query: DepartureQuery) -> Self {
        self.departure_query = query;
        self
    }

    pub fn with_arrival_source(mut self, source: ArrivalSource) -> Self {
        self.arrival_source = source;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_window: 10,
            max_results: 3,
            stale_tolerance_secs: 60,
            estimate_penalty_secs: 300,
            departure_query: DepartureQuery::Hybrid,
            arrival_source: ArrivalSource::Board,
        }
    }
}
