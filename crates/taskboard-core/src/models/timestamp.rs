//! Lenient timestamp (de)serialization
//!
//! The tracker API writes naive ISO 8601 timestamps (`2024-05-01T09:30:00`)
//! for columns stored without a zone. Those are read as UTC; offset-carrying
//! RFC 3339 values and bare dates are accepted as well.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse any timestamp shape the API is known to produce.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|r| {
            super::parse(&r)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", r)))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse("2024-05-01T09:30:00").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_parse_fractional_and_offset() {
        let naive = parse("2024-05-01T09:30:00.123456").unwrap();
        assert_eq!(naive.minute(), 30);

        let shifted = parse("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(shifted.hour(), 7);
    }

    #[test]
    fn test_parse_bare_date() {
        let dt = parse("2024-12-24").unwrap();
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("").is_none());
    }
}
