//! Huxley2 / Darwin LDB client.
//!
//! This module provides an HTTP client for Huxley2, a JSON front end to
//! the National Rail Darwin API, which provides real-time departure and
//! arrival boards.
//!
//! Key characteristics of Darwin:
//! - Service IDs are **ephemeral** - only valid while the service appears
//!   on a board (~2 minutes after expected departure)
//! - Times are in "HH:MM" format (UK local time), with no date
//! - The departures and arrivals boards can report the same train under
//!   differently-suffixed IDs

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DarwinClient, DarwinConfig};
pub use convert::{
    ConversionError, arrival_from_details, convert_arrival, convert_arrival_board,
    convert_departure, convert_departure_board,
};
pub use error::DarwinError;
pub use mock::MockDarwinClient;
pub use types::{
    ArrayOfCallingPoints, CallingPoint, NrccMessage, ServiceDetails, ServiceItem, ServiceLocation,
    StationBoard,
};
