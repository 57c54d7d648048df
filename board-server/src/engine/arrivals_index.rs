//! Lookup of arrival predictions by service matching key.
//!
//! Arrivals are fetched separately from departures and the two endpoints
//! don't always agree on the shape of a service ID, so every arrival is
//! indexed under each of its matching keys and a departure tries its own
//! keys in order.

use std::collections::HashMap;

use crate::domain::{ArrivalInfo, DepartureRecord};

/// Arrival predictions for one refresh cycle.
#[derive(Debug, Default)]
pub struct ArrivalsIndex {
    arrivals: Vec<ArrivalInfo>,

    /// Matching key -> position in `arrivals`.
    by_key: HashMap<String, usize>,
}

impl ArrivalsIndex {
    /// An index with nothing in it: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index. When two arrivals share a key, the first one wins.
    pub fn from_arrivals(arrivals: Vec<ArrivalInfo>) -> Self {
        let mut by_key = HashMap::new();

        for (idx, arrival) in arrivals.iter().enumerate() {
            for key in arrival.match_keys() {
                by_key.entry(key).or_insert(idx);
            }
        }

        Self { arrivals, by_key }
    }

    /// Find the arrival for a departure, trying its keys most tolerant first.
    pub fn lookup(&self, departure: &DepartureRecord) -> Option<&ArrivalInfo> {
        departure
            .match_keys()
            .iter()
            .find_map(|key| self.by_key.get(key))
            .map(|&idx| &self.arrivals[idx])
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}
