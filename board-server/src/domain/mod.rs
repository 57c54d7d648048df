//! Domain types for the departure board.
//!
//! Validated station codes, clock-time handling, the expected-status
//! variants and the records that flow through a refresh cycle. Types
//! enforce their invariants at construction time.

mod direction;
mod service;
mod station;
mod status;
mod time;
mod train;

pub use direction::{Direction, Route};
pub use service::{ArrivalInfo, DepartureRecord, Platform, match_keys};
pub use station::{Crs, InvalidCrs, Station, known_station};
pub use status::{ArrivalStatus, ExpectedStatus};
pub use time::{
    RailTime, TimeError, format_countdown, format_duration, journey_between, journey_duration,
    london_now, parse_clock_time, seconds_until,
};
pub use train::{ArrivalCertainty, ResolvedArrival, ResolvedTrain};
