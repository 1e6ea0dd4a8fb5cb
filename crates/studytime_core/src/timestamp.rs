//! crates/studytime_core/src/timestamp.rs
//!
//! Parsing of the ISO-8601 timestamps exchanged with the remote store.
//!
//! The store emits either offset-qualified timestamps (`2024-03-10T10:00:00Z`,
//! `...+02:00`) or naive ones (`2024-03-10T10:00:00`). Naive values are UTC
//! instants. Calendar-day placement always converts the instant into a single
//! caller-chosen time zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A record's date field could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed timestamp '{raw}'")]
pub struct TimestampError {
    pub raw: String,
}

/// Parses a wire timestamp into a UTC instant.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(TimestampError { raw: raw.to_string() })
}

/// The calendar day on which `raw` falls when viewed from `tz`.
pub fn calendar_day<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<NaiveDate, TimestampError> {
    Ok(parse_timestamp(raw)?.with_timezone(tz).date_naive())
}

/// Formats an instant the way the remote store expects it in request bodies.
pub fn to_wire(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn parses_offset_and_naive_forms() {
        let zulu = parse_timestamp("2024-03-10T10:00:00Z").unwrap();
        let naive = parse_timestamp("2024-03-10T10:00:00").unwrap();
        let fractional = parse_timestamp("2024-03-10T10:00:00.123456").unwrap();
        let short = parse_timestamp("2024-03-10T10:00").unwrap();
        assert_eq!(zulu, naive);
        assert_eq!(naive, short);
        assert_eq!(fractional.hour(), 10);

        let shifted = parse_timestamp("2024-03-10T12:00:00+02:00").unwrap();
        assert_eq!(shifted, zulu);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert_eq!(err.raw, "next tuesday");
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn calendar_day_follows_the_requested_zone() {
        let late = "2024-03-10T23:30:00Z";
        let march_10 = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(calendar_day(late, &Utc).unwrap(), march_10);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let march_11 = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(calendar_day(late, &plus_two).unwrap(), march_11);
    }

    #[test]
    fn wire_format_round_trips_through_the_parser() {
        let instant = parse_timestamp("2024-03-05T09:00:00Z").unwrap();
        assert_eq!(to_wire(instant), "2024-03-05T09:00:00.000Z");
        assert_eq!(parse_timestamp(&to_wire(instant)).unwrap(), instant);
    }
}
