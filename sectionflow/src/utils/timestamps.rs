//! Timestamp formatting for reports and logs.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Formats a timestamp as an ISO 8601 string.
///
/// The format is `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`, microsecond precision
/// with an explicit offset.
#[must_use]
pub fn format_iso8601(dt: &Timestamp) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Parses an ISO 8601 timestamp back into UTC.
///
/// Accepts the `+00:00` offset form produced by [`format_iso8601`] as well
/// as a trailing `Z`.
pub fn parse_iso8601(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Serde adapter serializing a required [`Timestamp`] as ISO 8601.
pub mod iso8601 {
    use super::{format_iso8601, parse_iso8601, Timestamp};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes the timestamp as an ISO 8601 string.
    pub fn serialize<S: Serializer>(dt: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso8601(dt))
    }

    /// Deserializes an ISO 8601 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_iso8601(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter serializing an optional [`Timestamp`] as ISO 8601 or null.
pub mod iso8601_opt {
    use super::{format_iso8601, parse_iso8601, Timestamp};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes the timestamp as an ISO 8601 string, or null.
    pub fn serialize<S: Serializer>(
        dt: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&format_iso8601(dt)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an ISO 8601 string or null.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| parse_iso8601(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_format_has_offset_and_microseconds() {
        let ts = format_iso8601(&now_utc());
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
        assert_eq!(ts.split('.').count(), 2);
    }

    #[test]
    fn test_round_trip() {
        let now = now_utc();
        let parsed = parse_iso8601(&format_iso8601(&now)).unwrap();
        // Microsecond formatting truncates sub-microsecond precision.
        assert!((now - parsed).num_microseconds().unwrap_or(0).abs() < 1);
    }

    #[test]
    fn test_parse_z_suffix() {
        let dt = parse_iso8601("2023-10-05T14:30:00Z").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 10);
        assert_eq!(dt.day(), 5);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(matches!(
            parse_iso8601("  "),
            Err(TimestampError::EmptyString)
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_iso8601("not-a-date"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }
}
