use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The ISO format used for completion dates on disk and on the command line.
const ISO_FORMAT: &str = "%Y-%m-%d";

/// A calendar day on which a habit was marked done.
///
/// There is no time-of-day or timezone component. Callers are responsible for
/// converting wall-clock instants into a day using a single consistent
/// timezone (see [`CompletionDate::from_datetime`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionDate(NaiveDate);

impl CompletionDate {
    /// Construct a date from its components.
    ///
    /// Returns `None` if the components do not form a valid calendar date.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The calendar day of `instant`, as observed in the instant's timezone.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    /// The day before this one.
    ///
    /// Returns `None` only at the lower bound of the representable range.
    #[must_use]
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The day after this one.
    #[must_use]
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Whole days from `self` to `other`.
    ///
    /// Positive when `other` is later than `self`.
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// The underlying [`NaiveDate`].
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CompletionDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CompletionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for CompletionDate {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_iso_shaped(s) {
            return Err(ParseDateError {
                input: s.to_string(),
                source: None,
            });
        }
        NaiveDate::parse_from_str(s, ISO_FORMAT)
            .map(Self)
            .map_err(|source| ParseDateError {
                input: s.to_string(),
                source: Some(source),
            })
    }
}

/// Exactly `DDDD-DD-DD`. chrono alone accepts signs and unpadded fields.
fn is_iso_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl TryFrom<&str> for CompletionDate {
    type Error = ParseDateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for CompletionDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompletionDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A string could not be parsed as an ISO `YYYY-MM-DD` date.
#[derive(Debug, thiserror::Error)]
#[error("invalid date '{input}', expected YYYY-MM-DD")]
pub struct ParseDateError {
    input: String,
    #[source]
    source: Option<chrono::ParseError>,
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> CompletionDate {
        s.parse().unwrap()
    }

    #[test]
    fn displays_as_iso() {
        let d = CompletionDate::new(2025, 3, 7).unwrap();
        assert_eq!(d.to_string(), "2025-03-07");
    }

    #[test_case("2025-02-30"; "day out of range")]
    #[test_case("2025-13-01"; "month out of range")]
    #[test_case("07/03/2025"; "wrong separator")]
    #[test_case(""; "empty")]
    #[test_case("2025-03-07T10:00:00Z"; "timestamp")]
    #[test_case("2025-7-4"; "unpadded fields")]
    #[test_case("+2025-07-04"; "sign prefix")]
    #[test_case(" 2025-07-04 "; "surrounding whitespace")]
    #[test_case("20250-7-04"; "misplaced separator")]
    fn rejects_malformed_input(input: &str) {
        assert!(input.parse::<CompletionDate>().is_err());
    }

    #[test]
    fn pred_crosses_month_and_year() {
        assert_eq!(date("2025-03-01").pred(), Some(date("2025-02-28")));
        assert_eq!(date("2024-03-01").pred(), Some(date("2024-02-29")));
        assert_eq!(date("2025-01-01").pred(), Some(date("2024-12-31")));
    }

    #[test]
    fn days_until_is_signed() {
        let a = date("2025-03-30");
        let b = date("2025-04-02");
        assert_eq!(a.days_until(b), 3);
        assert_eq!(b.days_until(a), -3);
        assert_eq!(a.days_until(a), 0);
    }

    #[test]
    fn days_until_ignores_daylight_saving() {
        // Europe switches to summer time on the last Sunday of March.
        assert_eq!(date("2025-03-29").days_until(date("2025-03-31")), 2);
    }

    #[test]
    fn from_datetime_uses_the_instant_timezone() {
        let utc = Utc.with_ymd_and_hms(2025, 7, 14, 23, 30, 0).unwrap();
        assert_eq!(CompletionDate::from_datetime(&utc), date("2025-07-14"));

        let ahead = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            CompletionDate::from_datetime(&utc.with_timezone(&ahead)),
            date("2025-07-15")
        );
    }

    #[test]
    fn serde_uses_iso_strings() {
        let d = date("2025-07-14");
        let yaml = serde_yaml::to_string(&d).unwrap();
        let back: CompletionDate = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, d);
        assert!(serde_yaml::from_str::<CompletionDate>("not-a-date").is_err());
    }
}
