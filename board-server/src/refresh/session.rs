//! Session state: direction, last published results, generation.

use chrono::{NaiveDateTime, Timelike};
use tracing::warn;

use crate::domain::{Direction, ResolvedTrain};

use super::store::DirectionStore;

/// What the last completed refresh produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Trains {
        trains: Vec<ResolvedTrain>,
        refreshed_at: NaiveDateTime,
    },
    /// The cycle failed outright; previous trains are not shown.
    Failed {
        message: String,
        refreshed_at: NaiveDateTime,
    },
}

impl CycleOutcome {
    pub fn refreshed_at(&self) -> NaiveDateTime {
        match self {
            CycleOutcome::Trains { refreshed_at, .. } | CycleOutcome::Failed { refreshed_at, .. } => {
                *refreshed_at
            }
        }
    }
}

/// Everything the board remembers between refreshes.
///
/// Each refresh takes a new generation number when it starts, and its
/// results are only published if no later refresh has started since.
#[derive(Debug, Clone)]
pub struct Session {
    direction: Direction,
    outcome: Option<CycleOutcome>,
    generation: u64,
}

impl Session {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            outcome: None,
            generation: 0,
        }
    }

    /// Start from the saved direction, or pick one from the time of day.
    pub fn restore(store: &dyn DirectionStore, now: NaiveDateTime, cutoff_hour: u32) -> Self {
        let saved = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "couldn't load saved direction");
            None
        });
        Self::new(saved.unwrap_or_else(|| Direction::for_hour(now.hour(), cutoff_hour)))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change direction. Results for the old direction are discarded.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.direction = direction;
            self.outcome = None;
        }
    }

    pub fn outcome(&self) -> Option<&CycleOutcome> {
        self.outcome.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Claim the generation number for a new refresh.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Publish a refresh's outcome. Returns false, leaving the session
    /// untouched, if a later refresh has started in the meantime.
    pub fn publish(&mut self, generation: u64, outcome: CycleOutcome) -> bool {
        if generation != self.generation {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    /// Bring the published countdowns up to `now`.
    pub fn tick(&mut self, now: NaiveDateTime, estimate_penalty_secs: i64) {
        if let Some(CycleOutcome::Trains { trains, .. }) = &mut self.outcome {
            for train in trains {
                train.recount(now, estimate_penalty_secs);
            }
        }
    }
}
