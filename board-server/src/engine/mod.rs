//! Arrival resolution and ranking.
//!
//! Given one cycle's departures from the origin and arrival predictions at
//! the destination, work out when each catchable train gets you there and
//! pick the best few:
//!
//! 1. resolve each departure in the candidate window (`resolve`),
//! 2. sort by arrival and drop overtaken trains (`rank`),
//! 3. truncate and turn into board rows (`presentation`).

mod arrivals_index;
mod config;
mod journey_cache;
mod presentation;
mod rank;
mod resolve;

pub use arrivals_index::ArrivalsIndex;
pub use config::{ArrivalSource, DepartureQuery, EngineConfig, MAX_RESULTS_CAP, UnknownVariant};
pub use journey_cache::JourneyTimeCache;
pub use presentation::{CHECK_AT_STATION, TrainPresentation, TrainStatus, UNKNOWN_TIME, Urgency};
pub use rank::{rank_trains, remove_overtaken};
pub use resolve::{CycleInput, best_trains, resolve_departures};
