//! Station types.

use std::fmt;

/// Error returned when parsing an invalid CRS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CRS code: {reason}")]
pub struct InvalidCrs {
    reason: &'static str,
}

/// A valid 3-letter CRS (Computer Reservation System) station code.
///
/// # Examples
///
/// ```
/// use board_server::domain::Crs;
///
/// let twi = Crs::parse("TWI").unwrap();
/// assert_eq!(twi.as_str(), "TWI");
///
/// assert!(Crs::parse("twi").is_err());
/// assert_eq!(Crs::parse_normalized(" twi ").unwrap(), twi);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crs([u8; 3]);

impl Crs {
    /// Parse a CRS code; the input must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCrs> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCrs {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCrs {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(Crs([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCrs> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({})", self.as_str())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station at one end of the configured route.
///
/// Besides its code and display name, a station carries alias names used
/// to recognise it as a train's destination on a board that was not
/// filtered upstream ("London Waterloo", "Waterloo", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub crs: Crs,
    pub name: String,
    pub aliases: Vec<String>,
}

impl Station {
    pub fn new(crs: Crs, name: impl Into<String>) -> Self {
        Self {
            crs,
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Whether a train's destination refers to this station.
    ///
    /// Matches on CRS when known, otherwise on a case-insensitive substring
    /// of the station name or any alias.
    pub fn is_destination(&self, destination_name: &str, destination_crs: Option<&Crs>) -> bool {
        if destination_crs == Some(&self.crs) {
            return true;
        }

        let haystack = destination_name.to_lowercase();
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|needle| !needle.is_empty() && haystack.contains(&needle.to_lowercase()))
    }
}

/// Built-in station definitions, so the route can be configured by CRS alone.
pub fn known_station(crs: &Crs) -> Option<Station> {
    let station = match crs.as_str() {
        "TWI" => Station::new(*crs, "Twickenham"),
        "WAT" => Station::new(*crs, "London Waterloo").with_alias("Waterloo"),
        "VIC" => Station::new(*crs, "London Victoria").with_alias("Victoria"),
        "CLJ" => Station::new(*crs, "Clapham Junction").with_alias("Clapham"),
        "PAD" => Station::new(*crs, "London Paddington").with_alias("Paddington"),
        "KGX" => Station::new(*crs, "London Kings Cross").with_alias("Kings Cross"),
        "LST" => Station::new(*crs, "London Liverpool Street").with_alias("Liverpool Street"),
        "CHX" => Station::new(*crs, "London Charing Cross").with_alias("Charing Cross"),
        "LBG" => Station::new(*crs, "London Bridge"),
        "CST" => Station::new(*crs, "London Cannon Street").with_alias("Cannon Street"),
        "RDG" => Station::new(*crs, "Reading"),
        "RMD" => Station::new(*crs, "Richmond"),
        _ => return None,
    };
    Some(station)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_crs() {
        assert!(Crs::parse("TWI").is_ok());
        assert!(Crs::parse("WAT").is_ok());
    }

    #[test]
    fn reject_invalid_crs() {
        assert!(Crs::parse("twi").is_err());
        assert!(Crs::parse("").is_err());
        assert!(Crs::parse("WATX").is_err());
        assert!(Crs::parse("W1T").is_err());
    }

    #[test]
    fn parse_normalized_trims_and_uppercases() {
        assert_eq!(Crs::parse_normalized(" wat\n").unwrap(), crs("WAT"));
        assert!(Crs::parse_normalized("wa").is_err());
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(crs("TWI").to_string(), "TWI");
        assert_eq!(format!("{:?}", crs("TWI")), "Crs(TWI)");
    }

    #[test]
    fn destination_by_crs() {
        let wat = known_station(&crs("WAT")).unwrap();
        assert!(wat.is_destination("Somewhere else", Some(&crs("WAT"))));
    }

    #[test]
    fn destination_by_alias_is_case_insensitive() {
        let wat = known_station(&crs("WAT")).unwrap();
        assert!(wat.is_destination("LONDON WATERLOO", None));
        assert!(wat.is_destination("Waterloo via Richmond", None));
        assert!(!wat.is_destination("Reading", Some(&crs("RDG"))));
    }

    #[test]
    fn unknown_station_has_no_definition() {
        assert!(known_station(&crs("ZZZ")).is_none());
    }
}
