//! Raw service records as read off the boards.
//!
//! A `DepartureRecord` comes from the origin's departure board and an
//! `ArrivalInfo` from the destination's arrivals board (or a service
//! detail lookup). Both are only valid for the refresh cycle that fetched
//! them: Darwin service IDs are ephemeral.

use std::fmt;

use super::{ArrivalStatus, Crs, ExpectedStatus};

/// Platform as shown on the board.
///
/// Darwin marks platforms that are only predicted with a trailing `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    number: String,
    confirmed: bool,
}

impl Platform {
    /// Parse a board platform field, `None` if blank.
    ///
    /// ```
    /// use board_server::domain::Platform;
    ///
    /// let p = Platform::parse("5*").unwrap();
    /// assert_eq!(p.number(), "5");
    /// assert!(!p.is_confirmed());
    /// assert!(Platform::parse(" ").is_none());
    /// ```
    pub fn parse(field: &str) -> Option<Self> {
        let confirmed = !field.contains('*');
        let number = field.replace('*', "").trim().to_string();
        if number.is_empty() {
            return None;
        }
        Some(Self { number, confirmed })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.number)
    }
}

/// A service on the origin's departure board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRecord {
    /// Opaque Darwin service ID, used to match against arrivals.
    pub service_id: String,
    /// Other encodings of the same ID that Huxley supplies.
    pub alternate_ids: Vec<String>,
    /// Scheduled departure, "HH:MM".
    pub scheduled_departure: String,
    pub expected_departure: ExpectedStatus,
    pub platform: Option<Platform>,
    /// Where the train terminates (display name).
    pub destination_name: String,
    pub destination_crs: Option<Crs>,
    pub operator_name: String,
    pub is_cancelled: bool,
}

impl DepartureRecord {
    /// Keys to try, in order, when looking this service up among arrivals.
    pub fn match_keys(&self) -> Vec<String> {
        match_keys(&self.service_id, &self.alternate_ids)
    }

    /// Whether the board reports the service as cancelled in either field.
    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled || self.expected_departure.is_cancelled()
    }

    /// The effective departure clock time: the revised time when one is
    /// known, the schedule otherwise.
    pub fn effective_departure(&self) -> Option<&str> {
        match &self.expected_departure {
            ExpectedStatus::OnTime | ExpectedStatus::DelayedNoTime => {
                Some(&self.scheduled_departure)
            }
            ExpectedStatus::DelayedWithTime(clock) => Some(clock),
            ExpectedStatus::Cancelled => None,
        }
    }
}

/// Arrival prediction for a service at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalInfo {
    pub service_id: String,
    pub alternate_ids: Vec<String>,
    /// Scheduled arrival, "HH:MM".
    pub scheduled_arrival: String,
    pub expected_arrival: ArrivalStatus,
}

impl ArrivalInfo {
    pub fn match_keys(&self) -> Vec<String> {
        match_keys(&self.service_id, &self.alternate_ids)
    }
}

/// Matching keys for a service, most tolerant first.
///
/// The same train can be reported with differently-shaped IDs by the
/// departures and arrivals endpoints (e.g. "3141592TWCKNHM_" vs
/// "3141592WATRLMN_"), so the leading numeric part is tried first, then
/// the exact ID, then any alternate encodings.
///
/// ```
/// use board_server::domain::match_keys;
///
/// assert_eq!(
///     match_keys("3141592TWCKNHM_", &[]),
///     vec!["#3141592".to_string(), "3141592TWCKNHM_".to_string()]
/// );
/// ```
pub fn match_keys(service_id: &str, alternate_ids: &[String]) -> Vec<String> {
    let mut keys = Vec::with_capacity(alternate_ids.len() + 2);

    let prefix: String = service_id
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if !prefix.is_empty() {
        // Namespaced so a prefix never collides with an exact ID.
        keys.push(format!("#{prefix}"));
    }

    for id in std::iter::once(service_id).chain(alternate_ids.iter().map(String::as_str)) {
        if !id.is_empty() && !keys.iter().any(|k| k == id) {
            keys.push(id.to_string());
        }
    }

    keys
}
