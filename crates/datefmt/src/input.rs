//! Accepted date inputs and their resolution to wall-clock time.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Anything the formatters accept.
///
/// Calendar dates and naive date-times are taken literally. Instants (zoned
/// values and epoch milliseconds) are shown in the machine's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    EpochMillis(i64),
    Text(String),
}

impl DateInput {
    /// Wall-clock date-time to render, or `None` when the input is empty or
    /// unparsable.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            DateInput::Date(date) => date.and_hms_opt(0, 0, 0),
            DateInput::DateTime(dt) => Some(*dt),
            DateInput::Instant(instant) => Some(instant.with_timezone(&Local).naive_local()),
            // Zero is "no date" to the callers that pass raw numbers around.
            DateInput::EpochMillis(0) => None,
            DateInput::EpochMillis(ms) => {
                DateTime::from_timestamp_millis(*ms).map(|dt| dt.with_timezone(&Local).naive_local())
            }
            DateInput::Text(text) => parse_text(text)?.resolve(),
        }
    }

    /// The input as a UTC instant. Naive values are read as local time.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            DateInput::Instant(instant) => Some(*instant),
            DateInput::EpochMillis(0) => None,
            DateInput::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            DateInput::Text(text) => parse_text(text)?.to_instant(),
            DateInput::Date(_) | DateInput::DateTime(_) => {
                let naive = self.resolve()?;
                Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// `YYYY-MM-DD` exactly, digits only.
pub(crate) fn is_iso_date_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn parse_text(text: &str) -> Option<DateInput> {
    if text.is_empty() {
        return None;
    }
    if is_iso_date_literal(text) {
        return NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(DateInput::Date);
    }
    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Some(DateInput::Instant(zoned.with_timezone(&Utc)));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(DateInput::DateTime)
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::DateTime(value)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(value.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_date_is_midnight_without_zone_shift() {
        let resolved = DateInput::from("2024-07-09").resolve().unwrap();
        assert_eq!(resolved.to_string(), "2024-07-09 00:00:00");
    }

    #[test]
    fn naive_datetime_text_is_taken_literally() {
        let resolved = DateInput::from("2024-07-09T13:05").resolve().unwrap();
        assert_eq!(resolved.to_string(), "2024-07-09 13:05:00");
    }

    #[test]
    fn garbage_and_empty_resolve_to_none() {
        for text in ["", "not a date", "2024-13-40", "2024/07/09", "24-07-09"] {
            assert!(DateInput::from(text).resolve().is_none(), "{text}");
        }
        assert!(DateInput::EpochMillis(0).resolve().is_none());
    }

    #[test]
    fn literal_detection() {
        assert!(is_iso_date_literal("2024-07-09"));
        assert!(!is_iso_date_literal("2024-7-9"));
        assert!(!is_iso_date_literal("2024-07-09T00:00"));
    }

    #[test]
    fn rfc3339_text_is_an_instant() {
        let input = DateInput::from("2024-07-09T14:27:00Z");
        assert_eq!(
            input.to_instant().unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 9, 14, 27, 0).unwrap()
        );
    }
}
