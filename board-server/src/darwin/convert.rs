//! Conversion from Huxley DTOs to domain records.
//!
//! A bad service never fails a whole board: it is logged and skipped, and
//! the rest of the board is used.

use chrono::NaiveTime;
use tracing::debug;

use crate::domain::{ArrivalInfo, ArrivalStatus, Crs, DepartureRecord, ExpectedStatus, Platform};

use super::types::{CallingPoint, ServiceDetails, ServiceItem, StationBoard};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert a departure board into departure records, in board order.
pub fn convert_departure_board(board: &StationBoard) -> Vec<DepartureRecord> {
    let services = board.train_services.as_deref().unwrap_or(&[]);

    services
        .iter()
        .filter_map(|item| match convert_departure(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(
                    board = %board.crs,
                    service = item.service_id.as_deref().unwrap_or("?"),
                    error = %e,
                    "skipping departure"
                );
                None
            }
        })
        .collect()
}

/// Convert a single departure board service.
pub fn convert_departure(item: &ServiceItem) -> Result<DepartureRecord, ConversionError> {
    let service_id = item
        .service_id
        .clone()
        .ok_or(ConversionError::MissingField("serviceID"))?;

    let scheduled_departure = item
        .std
        .as_deref()
        .ok_or(ConversionError::MissingField("std (scheduled departure)"))?;
    check_clock(scheduled_departure)?;

    let (destination_name, destination_crs) =
        parse_destination(item).ok_or(ConversionError::MissingField("destination"))?;

    Ok(DepartureRecord {
        alternate_ids: alternate_ids(item, &service_id),
        service_id,
        scheduled_departure: scheduled_departure.to_string(),
        expected_departure: ExpectedStatus::parse(item.etd.as_deref()),
        platform: item.platform.as_deref().and_then(Platform::parse),
        destination_name,
        destination_crs,
        operator_name: item.operator.clone().unwrap_or_default(),
        is_cancelled: item.is_cancelled.unwrap_or(false),
    })
}

/// Convert an arrivals board into arrival predictions.
pub fn convert_arrival_board(board: &StationBoard) -> Vec<ArrivalInfo> {
    let services = board.train_services.as_deref().unwrap_or(&[]);

    services
        .iter()
        .filter_map(|item| match convert_arrival(item) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(
                    board = %board.crs,
                    service = item.service_id.as_deref().unwrap_or("?"),
                    error = %e,
                    "skipping arrival"
                );
                None
            }
        })
        .collect()
}

/// Convert a single arrivals board service.
pub fn convert_arrival(item: &ServiceItem) -> Result<ArrivalInfo, ConversionError> {
    let service_id = item
        .service_id
        .clone()
        .ok_or(ConversionError::MissingField("serviceID"))?;

    let scheduled_arrival = item
        .sta
        .as_deref()
        .ok_or(ConversionError::MissingField("sta (scheduled arrival)"))?;
    check_clock(scheduled_arrival)?;

    let expected_arrival = if item.is_cancelled.unwrap_or(false) {
        ArrivalStatus::Expected(ExpectedStatus::Cancelled)
    } else {
        ArrivalStatus::parse(item.eta.as_deref())
    };

    Ok(ArrivalInfo {
        alternate_ids: alternate_ids(item, &service_id),
        service_id,
        scheduled_arrival: scheduled_arrival.to_string(),
        expected_arrival,
    })
}

/// Build an arrival prediction from a service's detail record.
///
/// Only calling points still to come are considered; a destination the
/// train has already passed, or doesn't call at, gives `Ok(None)`.
pub fn arrival_from_details(
    departure: &DepartureRecord,
    details: &ServiceDetails,
    destination: &Crs,
) -> Result<Option<ArrivalInfo>, ConversionError> {
    let Some(call) = find_subsequent_call(details, destination) else {
        return Ok(None);
    };

    let scheduled_arrival = call
        .st
        .as_deref()
        .ok_or(ConversionError::MissingField("st (scheduled time)"))?;
    check_clock(scheduled_arrival)?;

    let expected_arrival = if call.is_cancelled.unwrap_or(false) {
        ArrivalStatus::Expected(ExpectedStatus::Cancelled)
    } else {
        // An actual time, once reported, supersedes the estimate.
        ArrivalStatus::parse(call.at.as_deref().or(call.et.as_deref()))
    };

    Ok(Some(ArrivalInfo {
        service_id: departure.service_id.clone(),
        alternate_ids: departure.alternate_ids.clone(),
        scheduled_arrival: scheduled_arrival.to_string(),
        expected_arrival,
    }))
}

fn find_subsequent_call<'a>(
    details: &'a ServiceDetails,
    destination: &Crs,
) -> Option<&'a CallingPoint> {
    details
        .subsequent_calling_points
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .flat_map(|portion| portion.calling_point.iter())
        .find(|cp| {
            cp.crs
                .as_deref()
                .is_some_and(|crs| crs.eq_ignore_ascii_case(destination.as_str()))
        })
}

/// The other encodings Huxley gives for a service ID.
fn alternate_ids(item: &ServiceItem, service_id: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in [&item.service_id_url_safe, &item.service_id_guid]
        .into_iter()
        .flatten()
    {
        if id != service_id && !id.is_empty() && !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

/// Extract destination name and CRS. Split trains list every portion.
fn parse_destination(item: &ServiceItem) -> Option<(String, Option<Crs>)> {
    let dests = item.destination.as_deref().filter(|d| !d.is_empty())?;
    let first = &dests[0];
    let crs = first.crs.as_deref().and_then(|c| Crs::parse(c).ok());

    let name = if dests.len() == 1 {
        first.location_name.clone()
    } else {
        dests
            .iter()
            .map(|d| d.location_name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    };

    Some((name, crs))
}

fn check_clock(s: &str) -> Result<(), ConversionError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(|_| ())
        .map_err(|_| ConversionError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::types::{ArrayOfCallingPoints, ServiceLocation};

    fn location(name: &str, crs: &str) -> ServiceLocation {
        ServiceLocation {
            location_name: name.to_string(),
            crs: Some(crs.to_string()),
            via: None,
        }
    }

    fn service_item(id: &str, std: Option<&str>, etd: Option<&str>) -> ServiceItem {
        ServiceItem {
            service_id: Some(id.to_string()),
            service_id_url_safe: Some(id.to_string()),
            service_id_guid: Some(format!("guid-{id}")),
            rsid: None,
            sta: None,
            eta: None,
            std: std.map(str::to_string),
            etd: etd.map(str::to_string),
            platform: Some("2*".to_string()),
            operator: Some("South Western Railway".to_string()),
            operator_code: Some("SW".to_string()),
            is_cancelled: Some(false),
            origin: None,
            destination: Some(vec![location("London Waterloo", "WAT")]),
            subsequent_calling_points: None,
            cancel_reason: None,
            delay_reason: None,
        }
    }

    fn board(items: Vec<ServiceItem>) -> StationBoard {
        StationBoard {
            generated_at: None,
            location_name: "Twickenham".to_string(),
            crs: "TWI".to_string(),
            filter_location_name: None,
            filter_crs: None,
            train_services: Some(items),
            bus_services: None,
            platform_available: Some(true),
            are_services_available: Some(true),
            nrcc_messages: None,
        }
    }

    fn calling_point(crs: &str, st: &str, et: Option<&str>) -> CallingPoint {
        CallingPoint {
            location_name: crs.to_string(),
            crs: Some(crs.to_string()),
            st: Some(st.to_string()),
            et: et.map(str::to_string),
            at: None,
            is_cancelled: None,
            length: None,
        }
    }

    fn details(calls: Vec<CallingPoint>) -> ServiceDetails {
        ServiceDetails {
            generated_at: None,
            location_name: Some("Twickenham".to_string()),
            crs: Some("TWI".to_string()),
            operator: None,
            operator_code: None,
            is_cancelled: None,
            cancel_reason: None,
            delay_reason: None,
            platform: None,
            sta: None,
            eta: None,
            ata: None,
            std: Some("10:00".to_string()),
            etd: None,
            atd: None,
            previous_calling_points: Some(vec![ArrayOfCallingPoints {
                calling_point: vec![calling_point("WAT", "09:10", None)],
                service_change_required: None,
                assoc_is_cancelled: None,
            }]),
            subsequent_calling_points: Some(vec![ArrayOfCallingPoints {
                calling_point: calls,
                service_change_required: None,
                assoc_is_cancelled: None,
            }]),
        }
    }

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    #[test]
    fn convert_simple_departure() {
        let record = convert_departure(&service_item("1", Some("10:00"), Some("10:04"))).unwrap();

        assert_eq!(record.service_id, "1");
        assert_eq!(record.alternate_ids, vec!["guid-1".to_string()]);
        assert_eq!(record.scheduled_departure, "10:00");
        assert_eq!(
            record.expected_departure,
            ExpectedStatus::DelayedWithTime("10:04".to_string())
        );
        assert_eq!(record.destination_name, "London Waterloo");
        assert_eq!(record.destination_crs, Some(crs("WAT")));
        let platform = record.platform.unwrap();
        assert_eq!(platform.number(), "2");
        assert!(!platform.is_confirmed());
    }

    #[test]
    fn departure_without_etd_is_on_time() {
        let record = convert_departure(&service_item("1", Some("10:00"), None)).unwrap();
        assert_eq!(record.expected_departure, ExpectedStatus::OnTime);
    }

    #[test]
    fn departure_missing_fields_is_rejected() {
        assert_eq!(
            convert_departure(&service_item("1", None, None)),
            Err(ConversionError::MissingField("std (scheduled departure)"))
        );
        assert_eq!(
            convert_departure(&service_item("1", Some("soon"), None)),
            Err(ConversionError::InvalidTime("soon".to_string()))
        );

        let mut item = service_item("1", Some("10:00"), None);
        item.destination = Some(vec![]);
        assert_eq!(
            convert_departure(&item),
            Err(ConversionError::MissingField("destination"))
        );
    }

    #[test]
    fn board_skips_bad_services() {
        let converted = convert_departure_board(&board(vec![
            service_item("1", Some("10:00"), None),
            service_item("2", None, None),
            service_item("3", Some("10:15"), Some("Cancelled")),
        ]));

        let ids: Vec<_> = converted.iter().map(|d| d.service_id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(converted[1].is_cancelled());
    }

    #[test]
    fn split_train_lists_both_destinations() {
        let mut item = service_item("1", Some("10:00"), None);
        item.destination = Some(vec![
            location("Reading", "RDG"),
            location("Windsor & Eton Riverside", "WNR"),
        ]);
        let record = convert_departure(&item).unwrap();
        assert_eq!(record.destination_name, "Reading & Windsor & Eton Riverside");
        assert_eq!(record.destination_crs, Some(crs("RDG")));
    }

    #[test]
    fn convert_arrivals() {
        let mut on_time = service_item("1", None, None);
        on_time.sta = Some("10:25".to_string());
        on_time.eta = Some("On time".to_string());

        let mut unknown = service_item("2", None, None);
        unknown.sta = Some("10:40".to_string());
        unknown.eta = Some("No report".to_string());

        let mut cancelled = service_item("3", None, None);
        cancelled.sta = Some("10:55".to_string());
        cancelled.is_cancelled = Some(true);

        let no_sta = service_item("4", None, None);

        let arrivals = convert_arrival_board(&board(vec![on_time, unknown, cancelled, no_sta]));
        assert_eq!(arrivals.len(), 3);
        assert_eq!(
            arrivals[0].expected_arrival,
            ArrivalStatus::Expected(ExpectedStatus::OnTime)
        );
        assert_eq!(arrivals[1].expected_arrival, ArrivalStatus::CheckAtStation);
        assert_eq!(
            arrivals[2].expected_arrival,
            ArrivalStatus::Expected(ExpectedStatus::Cancelled)
        );
    }

    #[test]
    fn details_use_subsequent_destination_call() {
        let departure = convert_departure(&service_item("1", Some("10:00"), None)).unwrap();
        let details = details(vec![
            calling_point("RMD", "10:05", Some("On time")),
            calling_point("WAT", "10:25", Some("10:27")),
        ]);

        let info = arrival_from_details(&departure, &details, &crs("WAT"))
            .unwrap()
            .unwrap();
        assert_eq!(info.service_id, "1");
        assert_eq!(info.scheduled_arrival, "10:25");
        assert_eq!(
            info.expected_arrival,
            ArrivalStatus::Expected(ExpectedStatus::DelayedWithTime("10:27".to_string()))
        );
    }

    #[test]
    fn details_ignore_previous_calling_points() {
        let departure = convert_departure(&service_item("1", Some("10:00"), None)).unwrap();
        // WAT only appears among the previous calling points.
        let details = details(vec![calling_point("RDG", "10:45", None)]);

        assert_eq!(
            arrival_from_details(&departure, &details, &crs("WAT")).unwrap(),
            None
        );
    }

    #[test]
    fn cancelled_call_is_cancelled_arrival() {
        let departure = convert_departure(&service_item("1", Some("10:00"), None)).unwrap();
        let mut call = calling_point("WAT", "10:25", Some("On time"));
        call.is_cancelled = Some(true);

        let info = arrival_from_details(&departure, &details(vec![call]), &crs("WAT"))
            .unwrap()
            .unwrap();
        assert_eq!(
            info.expected_arrival,
            ArrivalStatus::Expected(ExpectedStatus::Cancelled)
        );
    }
}
