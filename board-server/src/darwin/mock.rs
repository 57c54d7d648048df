//! Mock Huxley client for testing without network access.
//!
//! Loads sample boards and service details from JSON files and serves
//! them as if they were live API responses. File names say what each
//! file answers:
//!
//! - `dep-{CRS}.json` and `dep-{CRS}-{FILTER}.json`: departure boards
//! - `arr-{CRS}.json` and `arr-{CRS}-{FILTER}.json`: arrival boards
//! - `svc-{ID}.json`: service details
//!
//! A filtered request falls back to the unfiltered board when there is no
//! file for the filter.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{ArrivalInfo, Crs, DepartureRecord};

use super::convert::{convert_arrival_board, convert_departure_board};
use super::error::DarwinError;
use super::types::{ServiceDetails, StationBoard};

#[derive(Debug, Default)]
struct MockData {
    boards: HashMap<String, StationBoard>,
    services: HashMap<String, ServiceDetails>,
}

/// Mock client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockDarwinClient {
    data: Arc<RwLock<MockData>>,
}

impl MockDarwinClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DarwinError> {
        Ok(Self {
            data: Arc::new(RwLock::new(load(data_dir.as_ref())?)),
        })
    }

    pub async fn get_departures(&self, origin: &Crs) -> Result<Vec<DepartureRecord>, DarwinError> {
        let data = self.data.read().await;
        let board = find_board(&data, "dep", origin, None)?;
        Ok(convert_departure_board(board))
    }

    pub async fn get_departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> Result<Vec<DepartureRecord>, DarwinError> {
        let data = self.data.read().await;
        let board = find_board(&data, "dep", origin, Some(filter))?;
        Ok(convert_departure_board(board))
    }

    pub async fn get_arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> Result<Vec<ArrivalInfo>, DarwinError> {
        let data = self.data.read().await;
        let board = find_board(&data, "arr", destination, Some(filter))?;
        Ok(convert_arrival_board(board))
    }

    pub async fn get_service_details(
        &self,
        service_id: &str,
    ) -> Result<ServiceDetails, DarwinError> {
        let data = self.data.read().await;
        data.services
            .get(service_id)
            .cloned()
            .ok_or(DarwinError::ServiceNotFound)
    }
}

fn find_board<'a>(
    data: &'a MockData,
    kind: &str,
    crs: &Crs,
    filter: Option<&Crs>,
) -> Result<&'a StationBoard, DarwinError> {
    let unfiltered = format!("{kind}-{}", crs.as_str());
    filter
        .and_then(|f| data.boards.get(&format!("{unfiltered}-{}", f.as_str())))
        .or_else(|| data.boards.get(&unfiltered))
        .ok_or_else(|| DarwinError::ApiError {
            status: 404,
            message: format!("no mock board {unfiltered}"),
        })
}

fn load(data_dir: &Path) -> Result<MockData, DarwinError> {
    let mut data = MockData::default();

    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| DarwinError::MockData(format!("reading {}: {e}", data_dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| DarwinError::MockData(format!("reading directory entry: {e}")))?
            .path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let json = std::fs::read_to_string(&path)
            .map_err(|e| DarwinError::MockData(format!("reading {}: {e}", path.display())))?;
        let parse_error =
            |e: serde_json::Error| DarwinError::MockData(format!("parsing {}: {e}", path.display()));

        if let Some(id) = stem.strip_prefix("svc-") {
            let details = serde_json::from_str(&json).map_err(parse_error)?;
            data.services.insert(id.to_string(), details);
        } else if stem.starts_with("dep-") || stem.starts_with("arr-") {
            let board = serde_json::from_str(&json).map_err(parse_error)?;
            data.boards.insert(stem.to_string(), board);
        }
    }

    if data.boards.is_empty() {
        return Err(DarwinError::MockData(format!(
            "no mock boards found in {}",
            data_dir.display()
        )));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpectedStatus;

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    const DIR: &str = "data/mock_boards";

    #[tokio::test]
    async fn loads_bundled_boards() {
        let client = MockDarwinClient::new(DIR).unwrap();

        let departures = client.get_departures(&crs("TWI")).await.unwrap();
        assert!(!departures.is_empty());
        assert_eq!(departures[0].scheduled_departure, "10:00");
    }

    #[tokio::test]
    async fn filtered_board_falls_back_to_unfiltered() {
        let client = MockDarwinClient::new(DIR).unwrap();

        let all = client.get_departures(&crs("TWI")).await.unwrap();
        let to_rdg = client
            .get_departures_to(&crs("TWI"), &crs("RDG"))
            .await
            .unwrap();
        assert_eq!(all, to_rdg);

        let to_wat = client
            .get_departures_to(&crs("TWI"), &crs("WAT"))
            .await
            .unwrap();
        assert!(to_wat.len() < all.len());
    }

    #[tokio::test]
    async fn arrivals_and_details() {
        let client = MockDarwinClient::new(DIR).unwrap();

        let arrivals = client
            .get_arrivals_from(&crs("WAT"), &crs("TWI"))
            .await
            .unwrap();
        assert!(!arrivals.is_empty());

        let departures = client.get_departures(&crs("TWI")).await.unwrap();
        let details = client
            .get_service_details(&departures[0].service_id)
            .await
            .unwrap();
        assert!(details.subsequent_calling_points.is_some());
        assert_eq!(departures[0].expected_departure, ExpectedStatus::OnTime);
    }

    #[tokio::test]
    async fn unknown_station_returns_error() {
        let client = MockDarwinClient::new(DIR).unwrap();
        assert!(client.get_departures(&crs("XYZ")).await.is_err());
        assert!(matches!(
            client.get_service_details("nope").await,
            Err(DarwinError::ServiceNotFound)
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MockDarwinClient::new(dir.path()),
            Err(DarwinError::MockData(_))
        ));
    }
}
