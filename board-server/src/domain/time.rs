//! Rail time handling.
//!
//! Huxley provides times as "HH:MM" strings in UK local time, with no date.
//! This module anchors those strings to a date relative to "now" (or to
//! another time, for arrivals of overnight services), computes signed
//! offsets and formats them for display.
//!
//! Every function takes `now` explicitly so a refresh cycle evaluates
//! against one frozen instant.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Europe::London;
use std::cmp::Ordering;
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Current wall-clock time in the UK.
pub fn london_now() -> NaiveDateTime {
    Utc::now().with_timezone(&London).naive_local()
}

/// A date-aware time for rail services.
///
/// Rail times need to track both the time of day and the date, because
/// overnight services cross midnight.
///
/// # Examples
///
/// ```
/// use board_server::domain::RailTime;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let time = RailTime::parse_hhmm("14:30", date).unwrap();
/// assert_eq!(time.to_string(), "14:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RailTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl RailTime {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse a time from "HH:MM" format on a given date.
    ///
    /// ```
    /// use board_server::domain::RailTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// assert!(RailTime::parse_hhmm("23:59", date).is_ok());
    /// assert!(RailTime::parse_hhmm("1430", date).is_err());
    /// assert!(RailTime::parse_hhmm("25:00", date).is_err());
    /// ```
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self { date, time })
    }

    /// Parse a clock time that happens at or after `anchor`.
    ///
    /// The time is placed on the anchor's date, and rolled forward one day
    /// if that would put it before the anchor (depart 23:50, arrive 00:10).
    pub fn parse_after(s: &str, anchor: RailTime) -> Result<Self, TimeError> {
        let parsed = Self::parse_hhmm(s, anchor.date)?;
        if parsed < anchor {
            parsed
                .checked_add(Duration::days(1))
                .ok_or_else(|| TimeError::new("date overflow"))
        } else {
            Ok(parsed)
        }
    }

    /// Parse a board clock time relative to `now`.
    ///
    /// Times are placed on today's date, except that a time more than
    /// twelve hours in the past is taken to be tomorrow's. A board shortly
    /// before midnight then lists "00:05" as five-past-midnight tonight
    /// rather than as a service that left almost a day ago.
    pub fn parse_near(s: &str, now: NaiveDateTime) -> Result<Self, TimeError> {
        let parsed = Self::parse_hhmm(s, now.date())?;
        if parsed.to_datetime() < now - Duration::hours(ROLLOVER_THRESHOLD_HOURS) {
            parsed
                .checked_add(Duration::days(1))
                .ok_or_else(|| TimeError::new("date overflow"))
        } else {
            Ok(parsed)
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Add a duration, advancing the date when crossing midnight.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_add_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }

    /// Signed seconds from `now` until this time; negative once passed.
    pub fn seconds_from(&self, now: NaiveDateTime) -> i64 {
        self.to_datetime().signed_duration_since(now).num_seconds()
    }
}

impl Ord for RailTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for RailTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RailTime({} {:02}:{:02})",
            self.date,
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// How far in the past a board time may be before it is read as tomorrow's.
const ROLLOVER_THRESHOLD_HOURS: i64 = 12;

/// Parse an "HH:MM" clock string against `now`'s date.
///
/// Returns `None` for empty or malformed input. If `reference` parses and
/// the result would fall before it, the result is rolled forward a day.
pub fn parse_clock_time(
    text: &str,
    reference: Option<&str>,
    now: NaiveDateTime,
) -> Option<RailTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let reference = reference.and_then(|r| RailTime::parse_hhmm(r.trim(), now.date()).ok());
    match reference {
        Some(anchor) => RailTime::parse_after(text, anchor).ok(),
        None => RailTime::parse_hhmm(text, now.date()).ok(),
    }
}

/// Signed seconds between the parsed clock time and `now`.
pub fn seconds_until(text: &str, reference: Option<&str>, now: NaiveDateTime) -> Option<i64> {
    parse_clock_time(text, reference, now).map(|t| t.seconds_from(now))
}

/// Format a countdown for display.
///
/// ```
/// use board_server::domain::format_countdown;
///
/// assert_eq!(format_countdown(-5), "Departed");
/// assert_eq!(format_countdown(0), "Now");
/// assert_eq!(format_countdown(42), "42s");
/// assert_eq!(format_countdown(120), "2m");
/// assert_eq!(format_countdown(125), "2m 5s");
/// ```
pub fn format_countdown(seconds: i64) -> String {
    match seconds {
        s if s < 0 => "Departed".to_string(),
        0 => "Now".to_string(),
        s if s < 60 => format!("{s}s"),
        s => {
            let minutes = s / 60;
            let remainder = s % 60;
            if remainder == 0 {
                format!("{minutes}m")
            } else {
                format!("{minutes}m {remainder}s")
            }
        }
    }
}

/// Journey duration between two clock strings.
///
/// The arrival is parsed with the departure as rollover reference, so an
/// overnight journey comes out positive. `None` if either side fails to
/// parse.
pub fn journey_duration(departure: &str, arrival: &str) -> Option<Duration> {
    // Any date will do: only the difference matters.
    let date = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    let dep = RailTime::parse_hhmm(departure.trim(), date).ok()?;
    let arr = RailTime::parse_after(arrival.trim(), dep).ok()?;
    journey_between(dep, arr)
}

/// Duration from `departure` to `arrival`, `None` if negative.
pub fn journey_between(departure: RailTime, arrival: RailTime) -> Option<Duration> {
    let duration = arrival.signed_duration_since(departure);
    (duration >= Duration::zero()).then_some(duration)
}

/// Format a journey duration, e.g. "30 mins" or "1h 5m".
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    match minutes {
        1 => "1 min".to_string(),
        m if m < 60 => format!("{m} mins"),
        m if m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{}h {}m", m / 60, m % 60),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Parse then display roundtrips
        #[test]
        fn parse_display_roundtrip(time_str in valid_time()) {
            let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
            let parsed = RailTime::parse_hhmm(&time_str, d).unwrap();
            prop_assert_eq!(parsed.to_string(), time_str);
        }

        /// Journey durations are never negative and never a day or more
        #[test]
        fn journey_duration_within_a_day(dep in valid_time(), arr in valid_time()) {
            let d = journey_duration(&dep, &arr).unwrap();
            prop_assert!(d >= Duration::zero());
            prop_assert!(d < Duration::days(1));
        }

        /// Anything parsed after an anchor is at or after it
        #[test]
        fn parse_after_never_precedes_anchor(anchor in valid_time(), t in valid_time()) {
            let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
            let anchor = RailTime::parse_hhmm(&anchor, d).unwrap();
            let parsed = RailTime::parse_after(&t, anchor).unwrap();
            prop_assert!(parsed >= anchor);
        }

        /// Countdowns above a minute always start with the whole minutes
        #[test]
        fn countdown_minutes_prefix(seconds in 60i64..100_000) {
            let s = format_countdown(seconds);
            let expected = format!("{}m", seconds / 60);
            prop_assert!(s.starts_with(&expected));
        }
    }
}
