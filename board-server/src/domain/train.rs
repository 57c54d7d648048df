//! Resolved trains: the engine's output for one refresh cycle.

use chrono::{Duration, NaiveDateTime};

use super::{Platform, RailTime, journey_between};

/// How much is known about a resolved arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalCertainty {
    /// Reported by the arrivals data.
    Confirmed,
    /// Synthesised from another service's journey time this cycle.
    Estimated,
    /// No arrival time at all.
    CheckAtStation,
}

/// Arrival at the destination after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedArrival {
    Confirmed {
        scheduled: RailTime,
        effective: RailTime,
    },
    Estimated {
        effective: RailTime,
    },
    CheckAtStation {
        /// Known when the arrivals data matched but gave no usable estimate.
        scheduled: Option<RailTime>,
    },
}

impl ResolvedArrival {
    pub fn certainty(&self) -> ArrivalCertainty {
        match self {
            ResolvedArrival::Confirmed { .. } => ArrivalCertainty::Confirmed,
            ResolvedArrival::Estimated { .. } => ArrivalCertainty::Estimated,
            ResolvedArrival::CheckAtStation { .. } => ArrivalCertainty::CheckAtStation,
        }
    }

    pub fn scheduled(&self) -> Option<RailTime> {
        match self {
            ResolvedArrival::Confirmed { scheduled, .. } => Some(*scheduled),
            ResolvedArrival::Estimated { .. } => None,
            ResolvedArrival::CheckAtStation { scheduled } => *scheduled,
        }
    }

    pub fn effective(&self) -> Option<RailTime> {
        match self {
            ResolvedArrival::Confirmed { effective, .. }
            | ResolvedArrival::Estimated { effective } => Some(*effective),
            ResolvedArrival::CheckAtStation { .. } => None,
        }
    }
}

/// A departure matched (or not) to its arrival, ready for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrain {
    pub service_id: String,
    pub scheduled_departure: RailTime,
    /// Scheduled, unless a delay with a known time pushed it later.
    pub effective_departure: RailTime,
    pub arrival: ResolvedArrival,
    pub platform: Option<Platform>,
    pub destination: String,
    pub operator: String,
    pub is_delayed: bool,
    /// Signed seconds from "now" to the effective departure.
    pub seconds_until_departure: i64,
    /// Signed seconds from "now" to the effective arrival, plus the ranking
    /// penalty for estimated arrivals. `None` when the arrival is unknown.
    pub seconds_until_arrival: Option<i64>,
}

impl ResolvedTrain {
    /// Effective journey time, when the arrival is known.
    pub fn duration(&self) -> Option<Duration> {
        journey_between(self.effective_departure, self.arrival.effective()?)
    }

    /// Recompute the countdowns against a later "now", keeping the penalty.
    pub fn recount(&mut self, now: NaiveDateTime, estimate_penalty_secs: i64) {
        self.seconds_until_departure = self.effective_departure.seconds_from(now);
        self.seconds_until_arrival = self.arrival.effective().map(|t| {
            let secs = t.seconds_from(now);
            match self.arrival.certainty() {
                ArrivalCertainty::Estimated => secs + estimate_penalty_secs,
                _ => secs,
            }
        });
    }
}
