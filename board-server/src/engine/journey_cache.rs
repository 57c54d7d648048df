//! Journey times observed during one refresh cycle.
//!
//! When a departure matches an arrival we learn how long that kind of train
//! takes between the two stations. A later departure of the same kind with
//! no arrival data can then be given an estimated arrival. The cache is
//! created empty for each cycle and dropped at its end.

use std::collections::HashMap;

use chrono::Duration;

use crate::domain::Crs;

/// `(origin, destination, train destination name)`.
type JourneyKey = (Crs, Crs, String);

#[derive(Debug, Default)]
pub struct JourneyTimeCache {
    durations: HashMap<JourneyKey, Duration>,
}

impl JourneyTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a journey time; the most recent observation wins.
    pub fn record(&mut self, origin: Crs, destination: Crs, train_destination: &str, d: Duration) {
        self.durations
            .insert((origin, destination, train_destination.to_string()), d);
    }

    pub fn get(&self, origin: Crs, destination: Crs, train_destination: &str) -> Option<Duration> {
        self.durations
            .get(&(origin, destination, train_destination.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}
