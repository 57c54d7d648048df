//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Route};
use crate::engine::TrainPresentation;
use crate::refresh::{CycleOutcome, Session};

/// The board as served to the page.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub direction: Direction,

    /// Origin station name
    pub from: String,

    /// Destination station name
    pub to: String,

    /// When the shown data was fetched ("HH:MM:SS"), if ever
    pub updated_at: Option<String>,

    /// Best trains, best first
    pub trains: Vec<TrainPresentation>,

    /// Set when the last refresh failed; `trains` is then empty
    pub error: Option<String>,
}

impl BoardResponse {
    /// Build from a session snapshot, with countdowns relative to `now`.
    pub fn from_session(session: &Session, route: &Route, now: NaiveDateTime) -> Self {
        let direction = session.direction();
        let (origin, destination) = route.endpoints(direction);

        let (trains, error) = match session.outcome() {
            Some(CycleOutcome::Trains { trains, .. }) => (
                trains
                    .iter()
                    .map(|t| TrainPresentation::new(t, now))
                    .collect(),
                None,
            ),
            Some(CycleOutcome::Failed { message, .. }) => (Vec::new(), Some(message.clone())),
            None => (Vec::new(), None),
        };

        Self {
            direction,
            from: origin.name.clone(),
            to: destination.name.clone(),
            updated_at: session
                .outcome()
                .map(|o| o.refreshed_at().format("%H:%M:%S").to_string()),
            trains,
            error,
        }
    }
}

/// Body of `POST /api/direction`. An empty body toggles.
#[derive(Debug, Deserialize)]
pub struct DirectionRequest {
    pub direction: Direction,
}

/// Body of `POST /api/visibility`.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
