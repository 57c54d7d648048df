//! Ranking of resolved trains.
//!
//! Trains are ordered by when they get you there, then trains that the
//! data says would be overtaken by a later departure are dropped.

use std::cmp::Ordering;

use crate::domain::ResolvedTrain;

/// Sort trains best-first.
///
/// Ordered by `seconds_until_arrival` (estimates already carry their
/// penalty). Trains with no arrival go last, among themselves by
/// departure. The sort is stable, so equal keys keep board order.
pub fn rank_trains(mut trains: Vec<ResolvedTrain>) -> Vec<ResolvedTrain> {
    trains.sort_by(compare_trains);
    trains
}

fn compare_trains(a: &ResolvedTrain, b: &ResolvedTrain) -> Ordering {
    match (a.seconds_until_arrival, b.seconds_until_arrival) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.seconds_until_departure.cmp(&b.seconds_until_departure),
    }
}

/// Drop trains that a later departure beats to the destination.
///
/// Walks the ranked list keeping a train unless one already kept leaves
/// strictly later and arrives strictly earlier. Only trains with a known
/// arrival take part, compared on their real (unpenalised) times.
pub fn remove_overtaken(ranked: Vec<ResolvedTrain>) -> Vec<ResolvedTrain> {
    let mut result: Vec<ResolvedTrain> = Vec::with_capacity(ranked.len());

    for train in ranked {
        let overtaken = train.arrival.effective().is_some_and(|arrival| {
            result.iter().any(|kept| {
                kept.arrival.effective().is_some_and(|kept_arrival| {
                    kept.effective_departure > train.effective_departure && kept_arrival < arrival
                })
            })
        });

        if !overtaken {
            result.push(train);
        }
    }

    result
}
