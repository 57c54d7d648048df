//! Display-ready view of a resolved train.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ArrivalCertainty, ResolvedArrival, ResolvedTrain, format_countdown, format_duration};

/// Shown in place of an unknown arrival time.
pub const UNKNOWN_TIME: &str = "--:--";

/// Label for an arrival with no usable prediction.
pub const CHECK_AT_STATION: &str = "Check at station";

/// How soon the train leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Two minutes or less.
    Urgent,
    /// Five minutes or less.
    Soon,
    Normal,
}

impl Urgency {
    pub fn from_seconds(seconds: i64) -> Self {
        match seconds {
            s if s <= 2 * 60 => Urgency::Urgent,
            s if s <= 5 * 60 => Urgency::Soon,
            _ => Urgency::Normal,
        }
    }

    /// CSS class used by the HTML board.
    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::Urgent => "urgent",
            Urgency::Soon => "soon",
            Urgency::Normal => "normal",
        }
    }
}

/// Cancelled services never reach the board, so a shown train is either
/// running to time or late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainStatus {
    OnTime,
    Delayed,
}

impl TrainStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrainStatus::OnTime => "On time",
            TrainStatus::Delayed => "Delayed",
        }
    }
}

/// One row of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainPresentation {
    pub service_id: String,
    pub scheduled_departure: String,
    /// Only set when it differs from the scheduled time.
    pub expected_departure: Option<String>,
    /// Scheduled arrival, or `UNKNOWN_TIME`.
    pub scheduled_arrival: String,
    /// Only set when it differs from the scheduled arrival.
    pub expected_arrival: Option<String>,
    pub arrival_certainty: ArrivalCertainty,
    /// "Check at station" when there's no arrival estimate.
    pub arrival_label: Option<String>,
    pub countdown: String,
    pub seconds_until_departure: i64,
    pub urgency: Urgency,
    pub platform: String,
    pub platform_confirmed: bool,
    pub status: TrainStatus,
    pub destination: String,
    pub operator: String,
    /// e.g. "30 mins", when the arrival is known.
    pub duration: Option<String>,
}

impl TrainPresentation {
    pub fn new(train: &ResolvedTrain, now: NaiveDateTime) -> Self {
        let seconds_until_departure = train.effective_departure.seconds_from(now);

        let expected_departure = (train.effective_departure != train.scheduled_departure)
            .then(|| train.effective_departure.to_string());

        let (scheduled_arrival, expected_arrival) = match &train.arrival {
            ResolvedArrival::Confirmed {
                scheduled,
                effective,
            } => (
                scheduled.to_string(),
                (effective != scheduled).then(|| effective.to_string()),
            ),
            ResolvedArrival::Estimated { effective } => {
                (UNKNOWN_TIME.to_string(), Some(effective.to_string()))
            }
            ResolvedArrival::CheckAtStation { scheduled } => (
                scheduled.map_or_else(|| UNKNOWN_TIME.to_string(), |t| t.to_string()),
                None,
            ),
        };

        let arrival_label = (train.arrival.certainty() == ArrivalCertainty::CheckAtStation)
            .then(|| CHECK_AT_STATION.to_string());

        let status = if train.is_delayed {
            TrainStatus::Delayed
        } else {
            TrainStatus::OnTime
        };

        Self {
            service_id: train.service_id.clone(),
            scheduled_departure: train.scheduled_departure.to_string(),
            expected_departure,
            scheduled_arrival,
            expected_arrival,
            arrival_certainty: train.arrival.certainty(),
            arrival_label,
            countdown: format_countdown(seconds_until_departure),
            seconds_until_departure,
            urgency: Urgency::from_seconds(seconds_until_departure),
            platform: train
                .platform
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.number().to_string()),
            platform_confirmed: train.platform.as_ref().is_some_and(|p| p.is_confirmed()),
            status,
            destination: train.destination.clone(),
            operator: train.operator.clone(),
            duration: train.duration().map(format_duration),
        }
    }

    /// CSS class for the arrival, by certainty.
    pub fn arrival_class(&self) -> &'static str {
        match self.arrival_certainty {
            ArrivalCertainty::Confirmed => "confirmed",
            ArrivalCertainty::Estimated => "estimated",
            ArrivalCertainty::CheckAtStation => "unknown",
        }
    }

    /// The arrival time to show most prominently.
    pub fn arrival_time(&self) -> &str {
        self.expected_arrival
            .as_deref()
            .unwrap_or(&self.scheduled_arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, RailTime};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn time(s: &str) -> RailTime {
        RailTime::parse_hhmm(s, date()).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, s).unwrap()
    }

    fn train(dep: &str, eff_dep: &str, arrival: ResolvedArrival) -> ResolvedTrain {
        ResolvedTrain {
            service_id: "1".to_string(),
            scheduled_departure: time(dep),
            effective_departure: time(eff_dep),
            arrival,
            platform: Platform::parse("4*"),
            destination: "London Waterloo".to_string(),
            operator: "South Western Railway".to_string(),
            is_delayed: dep != eff_dep,
            seconds_until_departure: 0,
            seconds_until_arrival: None,
        }
    }

    #[test]
    fn on_time_confirmed() {
        let t = train(
            "10:00",
            "10:00",
            ResolvedArrival::Confirmed {
                scheduled: time("10:30"),
                effective: time("10:30"),
            },
        );
        let p = TrainPresentation::new(&t, at(9, 50, 0));

        assert_eq!(p.scheduled_departure, "10:00");
        assert_eq!(p.expected_departure, None);
        assert_eq!(p.arrival_time(), "10:30");
        assert_eq!(p.arrival_label, None);
        assert_eq!(p.countdown, "10m");
        assert_eq!(p.urgency, Urgency::Normal);
        assert_eq!(p.platform, "4");
        assert!(!p.platform_confirmed);
        assert_eq!(p.status, TrainStatus::OnTime);
        assert_eq!(p.duration.as_deref(), Some("30 mins"));
    }

    #[test]
    fn delayed_shows_both_times() {
        let t = train(
            "10:00",
            "10:04",
            ResolvedArrival::Confirmed {
                scheduled: time("10:30"),
                effective: time("10:34"),
            },
        );
        let p = TrainPresentation::new(&t, at(10, 0, 0));

        assert_eq!(p.expected_departure.as_deref(), Some("10:04"));
        assert_eq!(p.scheduled_arrival, "10:30");
        assert_eq!(p.expected_arrival.as_deref(), Some("10:34"));
        assert_eq!(p.status, TrainStatus::Delayed);
        assert_eq!(p.urgency, Urgency::Soon);
    }

    #[test]
    fn delay_without_revised_time_is_still_delayed() {
        let mut t = train(
            "10:00",
            "10:00",
            ResolvedArrival::Confirmed {
                scheduled: time("10:30"),
                effective: time("10:30"),
            },
        );
        t.is_delayed = true;
        let p = TrainPresentation::new(&t, at(9, 50, 0));

        assert_eq!(p.expected_departure, None);
        assert_eq!(p.status, TrainStatus::Delayed);
        assert_eq!(p.status.label(), "Delayed");
    }

    #[test]
    fn unknown_arrival() {
        let mut t = train("10:00", "10:00", ResolvedArrival::CheckAtStation { scheduled: None });
        t.platform = None;
        let p = TrainPresentation::new(&t, at(9, 59, 0));

        assert_eq!(p.arrival_time(), UNKNOWN_TIME);
        assert_eq!(p.arrival_label.as_deref(), Some(CHECK_AT_STATION));
        assert_eq!(p.duration, None);
        assert_eq!(p.platform, "-");
        assert_eq!(p.urgency, Urgency::Urgent);
    }

    #[test]
    fn estimated_arrival_is_shown_without_penalty() {
        let t = train(
            "10:00",
            "10:00",
            ResolvedArrival::Estimated {
                effective: time("10:18"),
            },
        );
        let p = TrainPresentation::new(&t, at(9, 50, 0));
        assert_eq!(p.arrival_time(), "10:18");
        assert_eq!(p.arrival_certainty, ArrivalCertainty::Estimated);
        assert_eq!(p.duration.as_deref(), Some("18 mins"));
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::from_seconds(-10), Urgency::Urgent);
        assert_eq!(Urgency::from_seconds(120), Urgency::Urgent);
        assert_eq!(Urgency::from_seconds(121), Urgency::Soon);
        assert_eq!(Urgency::from_seconds(300), Urgency::Soon);
        assert_eq!(Urgency::from_seconds(301), Urgency::Normal);
    }
}
