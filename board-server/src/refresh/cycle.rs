//! One refresh cycle: fetch the boards, resolve and rank.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::darwin::{DarwinError, arrival_from_details};
use crate::domain::{
    ArrivalInfo, Crs, DepartureRecord, Direction, RailTime, ResolvedTrain, Route, Station,
};
use crate::engine::{ArrivalSource, ArrivalsIndex, CycleInput, DepartureQuery, EngineConfig, best_trains};

use super::source::BoardSource;

/// A cycle that produced nothing to show.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// The departures board couldn't be fetched
    #[error("failed to fetch departures from {station}: {source}")]
    Departures {
        station: Crs,
        #[source]
        source: DarwinError,
    },
}

/// Departures for the cycle, with the provenance the downstream filter needs.
struct FetchedDepartures {
    records: Vec<DepartureRecord>,
    /// Service IDs that upstream already filtered to the destination.
    upstream_filtered: HashSet<String>,
}

/// Run one cycle for the route in the given direction.
///
/// Only a failure to fetch departures is fatal. Missing arrival data just
/// leaves trains without a confirmed arrival.
pub async fn run_cycle<S: BoardSource>(
    source: &S,
    route: &Route,
    direction: Direction,
    now: NaiveDateTime,
    config: &EngineConfig,
) -> Result<Vec<ResolvedTrain>, CycleError> {
    let (origin, destination) = route.endpoints(direction);

    let FetchedDepartures {
        mut records,
        upstream_filtered,
    } = fetch_departures(source, origin, destination, now, config.departure_query).await?;

    // One window over the raw board, shared by detail lookups and the engine.
    records.truncate(config.candidate_window());

    let arrivals = match config.arrival_source {
        ArrivalSource::Board => board_arrivals(source, origin, destination).await,
        ArrivalSource::ServiceDetails => detail_arrivals(source, &records, &destination.crs).await,
    };
    let index = ArrivalsIndex::from_arrivals(arrivals);

    let before = records.len();
    let departures: Vec<DepartureRecord> = records
        .into_iter()
        .filter(|d| {
            upstream_filtered.contains(&d.service_id)
                || destination.is_destination(&d.destination_name, d.destination_crs.as_ref())
                || index.lookup(d).is_some()
        })
        .collect();
    debug!(
        kept = departures.len(),
        dropped = before - departures.len(),
        "applied destination filter"
    );

    let input = CycleInput {
        departures: &departures,
        arrivals: &index,
        origin: origin.crs,
        destination: destination.crs,
        now,
    };
    let trains = best_trains(&input, config);

    info!(
        origin = %origin.crs,
        destination = %destination.crs,
        departures = departures.len(),
        arrivals = index.len(),
        trains = trains.len(),
        "refresh cycle complete"
    );

    Ok(trains)
}

async fn fetch_departures<S: BoardSource>(
    source: &S,
    origin: &Station,
    destination: &Station,
    now: NaiveDateTime,
    query: DepartureQuery,
) -> Result<FetchedDepartures, CycleError> {
    let fatal = |source: DarwinError| CycleError::Departures {
        station: origin.crs,
        source,
    };

    match query {
        DepartureQuery::Filtered => {
            let records = source
                .departures_to(&origin.crs, &destination.crs)
                .await
                .map_err(fatal)?;
            let upstream_filtered = records.iter().map(|d| d.service_id.clone()).collect();
            Ok(FetchedDepartures {
                records,
                upstream_filtered,
            })
        }
        DepartureQuery::Downstream => {
            let records = source.departures(&origin.crs).await.map_err(fatal)?;
            Ok(FetchedDepartures {
                records,
                upstream_filtered: HashSet::new(),
            })
        }
        DepartureQuery::Hybrid => {
            let (filtered, unfiltered) = futures::join!(
                source.departures_to(&origin.crs, &destination.crs),
                source.departures(&origin.crs),
            );
            let filtered = filtered.map_err(fatal)?;
            let unfiltered = unfiltered.unwrap_or_else(|e| {
                warn!(
                    station = %origin.crs,
                    error = %e,
                    transient = e.is_transient(),
                    "unfiltered departures failed, using filtered board only"
                );
                Vec::new()
            });

            let upstream_filtered = filtered.iter().map(|d| d.service_id.clone()).collect();
            Ok(FetchedDepartures {
                records: merge_boards(filtered, unfiltered, now),
                upstream_filtered,
            })
        }
    }
}

/// Union of two boards, first occurrence of each service ID winning,
/// ordered by scheduled departure.
fn merge_boards(
    filtered: Vec<DepartureRecord>,
    unfiltered: Vec<DepartureRecord>,
    now: NaiveDateTime,
) -> Vec<DepartureRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<DepartureRecord> = filtered
        .into_iter()
        .chain(unfiltered)
        .filter(|d| seen.insert(d.service_id.clone()))
        .collect();

    // Unparseable times sort last; the engine drops them anyway.
    merged.sort_by_key(|d| {
        RailTime::parse_near(&d.scheduled_departure, now)
            .map(|t| (0, Some(t)))
            .unwrap_or((1, None))
    });
    merged
}

async fn board_arrivals<S: BoardSource>(
    source: &S,
    origin: &Station,
    destination: &Station,
) -> Vec<ArrivalInfo> {
    match source.arrivals_from(&destination.crs, &origin.crs).await {
        Ok(arrivals) => arrivals,
        Err(e) => {
            warn!(
                station = %destination.crs,
                error = %e,
                transient = e.is_transient(),
                "arrivals board failed, continuing without arrivals"
            );
            Vec::new()
        }
    }
}

/// One detail lookup per candidate, all in flight at once (the client
/// bounds real concurrency). Failures drop just that candidate's arrival.
async fn detail_arrivals<S: BoardSource>(
    source: &S,
    candidates: &[DepartureRecord],
    destination: &Crs,
) -> Vec<ArrivalInfo> {
    let lookups = candidates
        .iter()
        .filter(|d| !d.is_cancelled())
        .map(|departure| async move {
            match source.service_details(&departure.service_id).await {
                Ok(details) => match arrival_from_details(departure, &details, destination) {
                    Ok(arrival) => arrival,
                    Err(e) => {
                        debug!(service = %departure.service_id, error = %e, "unusable service details");
                        None
                    }
                },
                Err(e) => {
                    warn!(service = %departure.service_id, error = %e, "service details failed");
                    None
                }
            }
        });

    join_all(lookups).await.into_iter().flatten().collect()
}
