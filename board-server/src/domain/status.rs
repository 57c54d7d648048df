//! Expected-time status of a departure or arrival.
//!
//! Darwin reports the expected time as a free-text field: "On time",
//! "Delayed", "Cancelled", a clock time like "10:15", or nothing at all.
//! These types turn that into a closed set of cases.

/// Expected departure (or arrival) status as reported by the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpectedStatus {
    /// Running to schedule.
    OnTime,
    /// Late, but no revised time is known yet.
    DelayedNoTime,
    /// Running at a revised clock time ("HH:MM").
    DelayedWithTime(String),
    Cancelled,
}

impl ExpectedStatus {
    /// Parse an `etd` field.
    ///
    /// A missing, empty or unrecognised value carries no delay information
    /// and is read as on time.
    ///
    /// ```
    /// use board_server::domain::ExpectedStatus;
    ///
    /// assert_eq!(ExpectedStatus::parse(Some("On time")), ExpectedStatus::OnTime);
    /// assert_eq!(
    ///     ExpectedStatus::parse(Some("10:15")),
    ///     ExpectedStatus::DelayedWithTime("10:15".into())
    /// );
    /// assert_eq!(ExpectedStatus::parse(None), ExpectedStatus::OnTime);
    /// ```
    pub fn parse(field: Option<&str>) -> Self {
        classify(field).unwrap_or(ExpectedStatus::OnTime)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExpectedStatus::Cancelled)
    }

    pub fn is_delayed(&self) -> bool {
        matches!(
            self,
            ExpectedStatus::DelayedNoTime | ExpectedStatus::DelayedWithTime(_)
        )
    }
}

/// Expected arrival status at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrivalStatus {
    Expected(ExpectedStatus),
    /// Nothing usable is known; passengers are told to check at the station.
    CheckAtStation,
}

impl ArrivalStatus {
    /// Parse an `eta` (or calling point `et`/`at`) field.
    ///
    /// Unlike departures, a missing or unrecognised value ("No report")
    /// means the arrival is genuinely unknown.
    pub fn parse(field: Option<&str>) -> Self {
        match classify(field) {
            Some(status) => ArrivalStatus::Expected(status),
            None => ArrivalStatus::CheckAtStation,
        }
    }
}

/// Classify a status field, `None` when it says nothing recognisable.
fn classify(field: Option<&str>) -> Option<ExpectedStatus> {
    let field = field.map(str::trim).filter(|f| !f.is_empty())?;

    if field.eq_ignore_ascii_case("on time") {
        return Some(ExpectedStatus::OnTime);
    }
    if field.eq_ignore_ascii_case("delayed") {
        return Some(ExpectedStatus::DelayedNoTime);
    }
    if field.eq_ignore_ascii_case("cancelled") {
        return Some(ExpectedStatus::Cancelled);
    }
    if is_clock(field) {
        return Some(ExpectedStatus::DelayedWithTime(field.to_string()));
    }

    None
}

/// Shape check for "HH:MM"; range checks happen when the time is parsed.
fn is_clock(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}
