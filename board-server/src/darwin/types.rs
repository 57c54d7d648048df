//! Huxley2 API response DTOs.
//!
//! These types map directly to the Huxley2 JSON responses, which are
//! Darwin LDB responses with camelCase names. They use `Option` liberally
//! because fields are omitted or null whenever Darwin has nothing to say.

use serde::Deserialize;

/// Response from `/departures/...` or `/arrivals/...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoard {
    /// When this response was generated (ISO 8601 datetime).
    pub generated_at: Option<String>,

    /// Human-readable name of the station.
    pub location_name: String,

    /// CRS code of the station.
    pub crs: String,

    /// Name of the filter station, when the board was filtered.
    pub filter_location_name: Option<String>,

    /// Filter station CRS. Huxley spells this in lower case.
    #[serde(rename = "filtercrs")]
    pub filter_crs: Option<String>,

    /// Train services at this station.
    pub train_services: Option<Vec<ServiceItem>>,

    /// Bus replacement services.
    pub bus_services: Option<Vec<ServiceItem>>,

    /// Whether platform information is available at this station.
    pub platform_available: Option<bool>,

    /// Whether services are available (false during disruption).
    pub are_services_available: Option<bool>,

    /// Network Rail communication messages.
    pub nrcc_messages: Option<Vec<NrccMessage>>,
}

/// A service on a departure or arrival board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    /// Ephemeral Darwin service ID. Only valid while on the board.
    #[serde(rename = "serviceID")]
    pub service_id: Option<String>,

    /// The same ID, safe for use in a URL path.
    pub service_id_url_safe: Option<String>,

    /// The same ID as a GUID.
    pub service_id_guid: Option<String>,

    /// Retail Service ID.
    pub rsid: Option<String>,

    /// Scheduled time of arrival at this station.
    pub sta: Option<String>,

    /// Estimated time of arrival at this station.
    pub eta: Option<String>,

    /// Scheduled time of departure from this station.
    pub std: Option<String>,

    /// Estimated time of departure from this station.
    /// May be "On time", "Delayed", "Cancelled", or a time like "10:15".
    pub etd: Option<String>,

    pub platform: Option<String>,

    /// Train operating company name.
    pub operator: Option<String>,

    /// Train operating company ATOC code.
    pub operator_code: Option<String>,

    pub is_cancelled: Option<bool>,

    pub origin: Option<Vec<ServiceLocation>>,

    pub destination: Option<Vec<ServiceLocation>>,

    /// Only populated by expanded board requests.
    pub subsequent_calling_points: Option<Vec<ArrayOfCallingPoints>>,

    pub cancel_reason: Option<String>,

    pub delay_reason: Option<String>,
}

/// Response from `/service/{id}`.
///
/// Only works while the service is still on a board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub generated_at: Option<String>,

    /// Station the service was looked up from.
    pub location_name: Option<String>,

    pub crs: Option<String>,

    pub operator: Option<String>,

    pub operator_code: Option<String>,

    pub is_cancelled: Option<bool>,

    pub cancel_reason: Option<String>,

    pub delay_reason: Option<String>,

    pub platform: Option<String>,

    pub sta: Option<String>,

    pub eta: Option<String>,

    /// Actual arrival at the board station.
    pub ata: Option<String>,

    pub std: Option<String>,

    pub etd: Option<String>,

    /// Actual departure from the board station.
    pub atd: Option<String>,

    pub previous_calling_points: Option<Vec<ArrayOfCallingPoints>>,

    pub subsequent_calling_points: Option<Vec<ArrayOfCallingPoints>>,
}

/// Wrapper for a list of calling points.
///
/// Darwin wraps calling points like this to support split/join services,
/// where multiple arrays represent different portions of a train.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOfCallingPoints {
    #[serde(default)]
    pub calling_point: Vec<CallingPoint>,

    /// Whether a change of service is required at the split point.
    pub service_change_required: Option<bool>,

    /// Whether the associated service is cancelled (for joins).
    pub assoc_is_cancelled: Option<bool>,
}

/// A single calling point (station stop).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingPoint {
    pub location_name: String,

    pub crs: Option<String>,

    /// Scheduled time (arrival for subsequent calling points).
    pub st: Option<String>,

    /// Estimated time.
    pub et: Option<String>,

    /// Actual time (only present after the train has called).
    pub at: Option<String>,

    pub is_cancelled: Option<bool>,

    /// Train length at this stop.
    pub length: Option<i32>,
}

/// Origin or destination location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub location_name: String,

    pub crs: Option<String>,

    /// "via" text (e.g., "via Richmond").
    pub via: Option<String>,
}

/// Network Rail communication message.
#[derive(Debug, Clone, Deserialize)]
pub struct NrccMessage {
    /// The message content (may contain HTML).
    #[serde(alias = "Value")]
    pub value: Option<String>,
}
