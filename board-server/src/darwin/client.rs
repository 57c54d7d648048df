//! Huxley2 HTTP client.
//!
//! Huxley2 is a JSON proxy in front of the Darwin Live Departure Boards
//! SOAP API. Every request takes an optional access token as a query
//! parameter; the public instance works without one.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{ArrivalInfo, Crs, DepartureRecord};

use super::convert::{convert_arrival_board, convert_departure_board};
use super::error::DarwinError;
use super::types::{ServiceDetails, StationBoard};

/// Default base URL: the public Huxley2 instance.
pub const DEFAULT_BASE_URL: &str = "https://huxley2.azurewebsites.net";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default number of services per board request.
const DEFAULT_ROWS: u8 = 20;

/// Configuration for the Huxley client.
#[derive(Debug, Clone)]
pub struct DarwinConfig {
    /// Base URL for the API (defaults to the public Huxley2 instance)
    pub base_url: String,
    /// Darwin access token, passed through by Huxley
    pub access_token: Option<String>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Services requested per board
    pub rows: u8,
}

impl DarwinConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            rows: DEFAULT_ROWS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted Huxley).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set services per board request (Huxley caps this at 150).
    pub fn with_rows(mut self, rows: u8) -> Self {
        self.rows = rows.clamp(1, 150);
        self
    }
}

impl Default for DarwinConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Huxley2 API client.
///
/// Uses a semaphore to limit concurrent requests, so a burst of service
/// detail lookups can't swamp the upstream.
#[derive(Debug, Clone)]
pub struct DarwinClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
    rows: u8,
    semaphore: Arc<Semaphore>,
}

impl DarwinClient {
    pub fn new(config: DarwinConfig) -> Result<Self, DarwinError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DarwinError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DarwinError::InvalidUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token,
            rows: config.rows,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// All departures from `origin`, in board order.
    pub async fn get_departures(&self, origin: &Crs) -> Result<Vec<DepartureRecord>, DarwinError> {
        let rows = self.rows.to_string();
        let board: StationBoard = self
            .get_json(&["departures", origin.as_str(), &rows])
            .await?;
        Ok(convert_departure_board(&board))
    }

    /// Departures from `origin` that Darwin says call at `filter`.
    pub async fn get_departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> Result<Vec<DepartureRecord>, DarwinError> {
        let rows = self.rows.to_string();
        let board: StationBoard = self
            .get_json(&["departures", origin.as_str(), "to", filter.as_str(), &rows])
            .await?;
        Ok(convert_departure_board(&board))
    }

    /// Arrivals at `destination` of services that called at `filter`.
    pub async fn get_arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> Result<Vec<ArrivalInfo>, DarwinError> {
        let rows = self.rows.to_string();
        let board: StationBoard = self
            .get_json(&[
                "arrivals",
                destination.as_str(),
                "from",
                filter.as_str(),
                &rows,
            ])
            .await?;
        Ok(convert_arrival_board(&board))
    }

    /// Get service details by ID.
    ///
    /// **Important:** Darwin service IDs are ephemeral and only valid while
    /// the service appears on a board (~2 minutes after expected
    /// departure). Expect `ServiceNotFound` once the ID has expired.
    pub async fn get_service_details(
        &self,
        service_id: &str,
    ) -> Result<ServiceDetails, DarwinError> {
        self.get_json(&["service", service_id]).await
    }

    /// Build the request URL. Segments are percent-encoded, which matters
    /// for service IDs containing `/` or `+`.
    fn url(&self, segments: &[&str]) -> Result<Url, DarwinError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| DarwinError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("accessToken", token);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DarwinError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DarwinError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.url(segments)?;
        debug!(path = url.path(), "huxley request");

        let response = self.http.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DarwinError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DarwinError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DarwinError::ServiceNotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DarwinError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // Expired service IDs come back as an empty body or "null"
        if body.trim().is_empty() || body.trim() == "null" {
            return Err(DarwinError::ServiceNotFound);
        }

        serde_json::from_str(&body).map_err(|e| DarwinError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = DarwinConfig::new()
            .with_base_url("http://localhost:8080")
            .with_access_token("token")
            .with_max_concurrent(10)
            .with_timeout(60)
            .with_rows(200);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.rows, 150);
    }

    #[test]
    fn config_defaults() {
        let config = DarwinConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.access_token, None);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.rows, DEFAULT_ROWS);
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = DarwinConfig::new().with_base_url("not a url");
        assert!(matches!(
            DarwinClient::new(config),
            Err(DarwinError::InvalidUrl(_))
        ));
    }

    #[test]
    fn board_urls() {
        let client = DarwinClient::new(DarwinConfig::new()).unwrap();

        let url = client
            .url(&["departures", crs("TWI").as_str(), "to", crs("WAT").as_str(), "20"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://huxley2.azurewebsites.net/departures/TWI/to/WAT/20"
        );

        let url = client.url(&["arrivals", "WAT", "from", "TWI", "20"]).unwrap();
        assert_eq!(url.path(), "/arrivals/WAT/from/TWI/20");
    }

    #[test]
    fn access_token_and_trailing_slash() {
        let config = DarwinConfig::new()
            .with_base_url("http://localhost:8080/huxley/")
            .with_access_token("abc");
        let client = DarwinClient::new(config).unwrap();

        let url = client.url(&["departures", "TWI", "10"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/huxley/departures/TWI/10?accessToken=abc"
        );
    }

    #[test]
    fn service_ids_are_escaped() {
        let client = DarwinClient::new(DarwinConfig::new()).unwrap();
        let url = client.url(&["service", "ab/cd+ef=="]).unwrap();
        assert_eq!(url.path(), "/service/ab%2Fcd+ef==");
    }
}
