//! Arrival resolution for one refresh cycle.
//!
//! Walks the departure board in order, drops what can't be caught, matches
//! each remaining departure to its arrival and fills gaps from journey
//! times seen earlier in the same walk.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{
    ArrivalInfo, ArrivalStatus, Crs, DepartureRecord, ExpectedStatus, RailTime,
    ResolvedArrival, ResolvedTrain, journey_between,
};

use super::arrivals_index::ArrivalsIndex;
use super::config::EngineConfig;
use super::journey_cache::JourneyTimeCache;
use super::rank::{rank_trains, remove_overtaken};

/// Everything one cycle of the engine works from.
#[derive(Debug)]
pub struct CycleInput<'a> {
    /// Departures in board order (scheduled departure).
    pub departures: &'a [DepartureRecord],
    pub arrivals: &'a ArrivalsIndex,
    pub origin: Crs,
    pub destination: Crs,
    /// The frozen "now" for the whole cycle.
    pub now: NaiveDateTime,
}

/// Resolve, rank, filter and truncate: the full engine pass.
pub fn best_trains(input: &CycleInput<'_>, config: &EngineConfig) -> Vec<ResolvedTrain> {
    let resolved = resolve_departures(input, config);
    let ranked = rank_trains(resolved);
    let mut consistent = remove_overtaken(ranked);
    consistent.truncate(config.max_results());
    consistent
}

/// Resolve the arrival of every usable departure in the candidate window.
///
/// Order matters: a departure can only borrow a journey time from one that
/// came before it on the board.
pub fn resolve_departures(input: &CycleInput<'_>, config: &EngineConfig) -> Vec<ResolvedTrain> {
    let mut journey_times = JourneyTimeCache::new();
    let mut resolved = Vec::new();

    for departure in input.departures.iter().take(config.candidate_window()) {
        if let Some(train) = resolve_departure(departure, input, &mut journey_times, config) {
            resolved.push(train);
        }
    }

    debug!(
        considered = input.departures.len().min(config.candidate_window()),
        resolved = resolved.len(),
        journey_times = journey_times.len(),
        "resolved departures"
    );

    resolved
}

fn resolve_departure(
    departure: &DepartureRecord,
    input: &CycleInput<'_>,
    journey_times: &mut JourneyTimeCache,
    config: &EngineConfig,
) -> Option<ResolvedTrain> {
    if departure.is_cancelled() {
        debug!(service = %departure.service_id, "skipping cancelled departure");
        return None;
    }

    let Ok(scheduled_departure) = RailTime::parse_near(&departure.scheduled_departure, input.now)
    else {
        debug!(
            service = %departure.service_id,
            std = %departure.scheduled_departure,
            "skipping departure with unparseable schedule"
        );
        return None;
    };

    // A revised time we can't read falls back to the schedule.
    let effective_departure = RailTime::parse_near(departure.effective_departure()?, input.now)
        .unwrap_or(scheduled_departure);

    let seconds_until_departure = effective_departure.seconds_from(input.now);
    if seconds_until_departure < -config.stale_tolerance_secs {
        return None;
    }

    let key_destination = departure.destination_name.as_str();
    let matched = input
        .arrivals
        .lookup(departure)
        .map(|info| match_arrival(info, scheduled_departure, effective_departure));

    let arrival = match matched {
        Some(MatchedArrival::Cancelled) => {
            debug!(service = %departure.service_id, "arrival cancelled, dropping service");
            return None;
        }
        Some(MatchedArrival::Confirmed {
            scheduled,
            effective,
        }) => {
            if let Some(journey) = journey_between(scheduled_departure, scheduled) {
                journey_times.record(input.origin, input.destination, key_destination, journey);
            }
            ResolvedArrival::Confirmed {
                scheduled,
                effective,
            }
        }
        Some(MatchedArrival::Unknown { scheduled }) => {
            estimate_arrival(effective_departure, scheduled, input, key_destination, journey_times)
        }
        None => estimate_arrival(effective_departure, None, input, key_destination, journey_times),
    };

    let mut train = ResolvedTrain {
        service_id: departure.service_id.clone(),
        scheduled_departure,
        effective_departure,
        arrival,
        platform: departure.platform.clone(),
        destination: departure.destination_name.clone(),
        operator: departure.operator_name.clone(),
        is_delayed: departure.expected_departure.is_delayed(),
        seconds_until_departure,
        seconds_until_arrival: None,
    };
    train.recount(input.now, config.estimate_penalty_secs);
    Some(train)
}

/// Outcome of matching a departure against its arrival record.
#[derive(Debug, PartialEq, Eq)]
enum MatchedArrival {
    Cancelled,
    Confirmed {
        scheduled: RailTime,
        effective: RailTime,
    },
    /// Matched, but with no usable arrival time.
    Unknown { scheduled: Option<RailTime> },
}

fn match_arrival(
    info: &ArrivalInfo,
    scheduled_departure: RailTime,
    effective_departure: RailTime,
) -> MatchedArrival {
    if info.expected_arrival == ArrivalStatus::Expected(ExpectedStatus::Cancelled) {
        return MatchedArrival::Cancelled;
    }

    let Ok(scheduled) = RailTime::parse_after(&info.scheduled_arrival, scheduled_departure) else {
        return MatchedArrival::Unknown { scheduled: None };
    };

    // Assume a delay without a revised arrival time carries through the
    // journey unchanged.
    let propagated = || {
        journey_between(scheduled_departure, scheduled)
            .and_then(|journey| effective_departure.checked_add(journey))
            .unwrap_or(scheduled)
    };

    let effective = match &info.expected_arrival {
        ArrivalStatus::CheckAtStation => {
            return MatchedArrival::Unknown {
                scheduled: Some(scheduled),
            };
        }
        ArrivalStatus::Expected(ExpectedStatus::Cancelled) => return MatchedArrival::Cancelled,
        ArrivalStatus::Expected(ExpectedStatus::OnTime) => scheduled,
        ArrivalStatus::Expected(ExpectedStatus::DelayedNoTime) => propagated(),
        ArrivalStatus::Expected(ExpectedStatus::DelayedWithTime(clock)) => {
            RailTime::parse_after(clock, scheduled_departure).unwrap_or_else(|_| propagated())
        }
    };

    MatchedArrival::Confirmed {
        scheduled,
        effective,
    }
}

/// Fall back to a journey time seen earlier this cycle, if any.
fn estimate_arrival(
    effective_departure: RailTime,
    scheduled: Option<RailTime>,
    input: &CycleInput<'_>,
    train_destination: &str,
    journey_times: &JourneyTimeCache,
) -> ResolvedArrival {
    journey_times
        .get(input.origin, input.destination, train_destination)
        .and_then(|journey| effective_departure.checked_add(journey))
        .map(|effective| ResolvedArrival::Estimated { effective })
        .unwrap_or(ResolvedArrival::CheckAtStation { scheduled })
}
