//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::darwin::{DEFAULT_BASE_URL, DarwinConfig};
use crate::domain::{Crs, InvalidCrs, Route, Station, known_station};
use crate::engine::{ArrivalSource, DepartureQuery, EngineConfig, UnknownVariant};
use crate::refresh::SchedulerConfig;

/// A configuration variable couldn't be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidCrs {
        var: &'static str,
        #[source]
        source: InvalidCrs,
    },

    #[error("{var}: unknown station {crs}")]
    UnknownStation { var: &'static str, crs: Crs },

    #[error("{var}: expected a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: {source}")]
    InvalidChoice {
        var: &'static str,
        #[source]
        source: UnknownVariant,
    },

    #[error("{var}: invalid address {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("home and city stations are both {0}")]
    SameStations(Crs),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub darwin: DarwinConfig,
    pub route: Route,
    pub engine: EngineConfig,
    pub scheduler: SchedulerConfig,
    /// Hour (0-23) from which the board defaults to the inbound direction
    pub cutoff_hour: u32,
    pub direction_file: PathBuf,
    pub bind: SocketAddr,
    /// Serve sample boards from this directory instead of the live API
    pub mock_data: Option<PathBuf>,
    pub static_dir: String,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let mut darwin = DarwinConfig::new()
            .with_base_url(get("HUXLEY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()));
        if let Some(token) = get("HUXLEY_ACCESS_TOKEN") {
            darwin = darwin.with_access_token(token);
        }

        let home = station("BOARD_HOME_CRS", get("BOARD_HOME_CRS"), "TWI")?;
        let city = station("BOARD_CITY_CRS", get("BOARD_CITY_CRS"), "WAT")?;
        if home.crs == city.crs {
            return Err(ConfigError::SameStations(home.crs));
        }

        let mut engine = EngineConfig::default();
        if let Some(n) = number("BOARD_MAX_RESULTS", get("BOARD_MAX_RESULTS"))? {
            engine = engine.with_max_results(n);
        }
        if let Some(n) = number("BOARD_CANDIDATE_WINDOW", get("BOARD_CANDIDATE_WINDOW"))? {
            engine = engine.with_candidate_window(n);
        }
        if let Some(value) = get("BOARD_DEPARTURE_QUERY") {
            let query = value
                .parse::<DepartureQuery>()
                .map_err(|source| ConfigError::InvalidChoice {
                    var: "BOARD_DEPARTURE_QUERY",
                    source,
                })?;
            engine = engine.with_departure_query(query);
        }
        if let Some(value) = get("BOARD_ARRIVAL_SOURCE") {
            let source = value
                .parse::<ArrivalSource>()
                .map_err(|source| ConfigError::InvalidChoice {
                    var: "BOARD_ARRIVAL_SOURCE",
                    source,
                })?;
            engine = engine.with_arrival_source(source);
        }

        let mut scheduler = SchedulerConfig::default();
        if let Some(secs) = number("BOARD_REFRESH_SECS", get("BOARD_REFRESH_SECS"))? {
            scheduler = scheduler.with_refresh_interval(Duration::from_secs(secs.max(1) as u64));
        }

        let cutoff_hour = number("BOARD_CUTOFF_HOUR", get("BOARD_CUTOFF_HOUR"))?
            .map_or(14, |h| h.min(23) as u32);

        let bind = match get("BOARD_BIND") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidAddress {
                    var: "BOARD_BIND",
                    value,
                })?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        Ok(Self {
            darwin,
            route: Route::new(home, city),
            engine,
            scheduler,
            cutoff_hour,
            direction_file: get("BOARD_DIRECTION_FILE")
                .map_or_else(|| PathBuf::from("direction.json"), PathBuf::from),
            bind,
            mock_data: get("BOARD_MOCK_DATA").map(PathBuf::from),
            static_dir: get("BOARD_STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }
}

fn station(var: &'static str, value: Option<String>, default: &str) -> Result<Station, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());
    let crs = Crs::parse_normalized(&value)
        .map_err(|source| ConfigError::InvalidCrs { var, source })?;
    known_station(&crs).ok_or(ConfigError::UnknownStation { var, crs })
}

fn number(var: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value: v })
        })
        .transpose()
}
