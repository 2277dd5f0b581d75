//! Date, timestamp and interval types
//!
//! Timestamps are normalized to UTC on input and always rendered with a `Z`
//! suffix. The text form carries exactly six fractional-second digits; the
//! JSON form uses the shortest RFC 3339 spelling that loses no precision.

use crate::Error;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::expr::Function;

/// One endpoint of a temporal interval.
///
/// The grammar allows both endpoints to be the `..` sentinel; such an
/// interval is unbounded on both sides and of questionable use, but it is
/// accepted and round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalBound {
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    /// The `..` open-end sentinel
    Open,
    Property(String),
    Function(Function),
}

pub fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::Encoding(format!("invalid date {s:?}: {e}")))
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Encoding(format!("invalid timestamp {s:?}: {e}")))
}

/// Text spelling: six fractional digits, zero-padded.
pub fn format_timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// JSON spelling: shortest lossless RFC 3339 form.
pub fn format_timestamp_json(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_text_has_six_fraction_digits() {
        let ts = parse_timestamp("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(format_timestamp_text(&ts), "2020-01-01T00:00:00.000000Z");

        let ts = parse_timestamp("2020-01-01T00:00:00.5Z").unwrap();
        assert_eq!(format_timestamp_text(&ts), "2020-01-01T00:00:00.500000Z");
    }

    #[test]
    fn timestamp_json_is_shortest_lossless() {
        let ts = parse_timestamp("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(format_timestamp_json(&ts), "2020-01-01T00:00:00Z");
    }

    #[test]
    fn offsets_normalize_to_utc() {
        let ts = parse_timestamp("2020-01-01T01:00:00+01:00").unwrap();
        assert_eq!(format_timestamp_json(&ts), "2020-01-01T00:00:00Z");
    }

    #[test]
    fn invalid_instants_are_encoding_errors() {
        assert!(matches!(parse_date("2020-13-01"), Err(Error::Encoding(_))));
        assert!(matches!(
            parse_timestamp("2020-01-01T25:00:00Z"),
            Err(Error::Encoding(_))
        ));
    }
}
