//! Travel direction along the configured route.

use serde::{Deserialize, Serialize};

use super::Station;

/// Which way along the route the board is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Home towards the city: the morning commute.
    Outbound,
    /// City back home.
    Inbound,
}

impl Direction {
    /// Default direction for a given local hour.
    ///
    /// ```
    /// use board_server::domain::Direction;
    ///
    /// assert_eq!(Direction::for_hour(8, 14), Direction::Outbound);
    /// assert_eq!(Direction::for_hour(14, 14), Direction::Inbound);
    /// ```
    pub fn for_hour(hour: u32, cutoff_hour: u32) -> Self {
        if hour < cutoff_hour {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Direction::Outbound => Direction::Inbound,
            Direction::Inbound => Direction::Outbound,
        }
    }
}

/// The two fixed stations the board serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub home: Station,
    pub city: Station,
}

impl Route {
    pub fn new(home: Station, city: Station) -> Self {
        Self { home, city }
    }

    /// `(origin, destination)` for a direction.
    pub fn endpoints(&self, direction: Direction) -> (&Station, &Station) {
        match direction {
            Direction::Outbound => (&self.home, &self.city),
            Direction::Inbound => (&self.city, &self.home),
        }
    }
}
