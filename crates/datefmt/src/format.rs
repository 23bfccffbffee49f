//! US-style display formatters.
//!
//! Every formatter returns `""` for empty or unparsable input instead of
//! failing.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::America::Los_Angeles;

use crate::input::DateInput;

fn render(input: impl Into<DateInput>, pattern: &str) -> String {
    match input.into().resolve() {
        Some(dt) => render_naive(&dt, pattern),
        None => String::new(),
    }
}

fn render_naive(dt: &NaiveDateTime, pattern: &str) -> String {
    dt.format(pattern).to_string()
}

/// `07/09/2024`
pub fn format_date_mmddyyyy(input: impl Into<DateInput>) -> String {
    render(input, "%m/%d/%Y")
}

/// `July 2024`
pub fn format_date_month_yyyy(input: impl Into<DateInput>) -> String {
    render(input, "%B %Y")
}

/// `July 09, 2024`
pub fn format_date_month_ddyyyy(input: impl Into<DateInput>) -> String {
    render(input, "%B %d, %Y")
}

/// `July 9, 2024`
pub fn format_date_month_dyyyy(input: impl Into<DateInput>) -> String {
    render(input, "%B %-d, %Y")
}

/// `07/09/2024 1:05 PM`. Midnight renders as `12:00 AM`.
pub fn format_datetime_mmddyyyy_hhmiam(input: impl Into<DateInput>) -> String {
    render(input, "%m/%d/%Y %-I:%M %p")
}

/// `July 09, 2024 01:05 PM`
pub fn format_datetime_month_ddyyyy_hhmiam(input: impl Into<DateInput>) -> String {
    render(input, "%B %d, %Y %I:%M %p")
}

/// `July 9, 2024 1:05 PM`
pub fn format_datetime_month_dyyyy_hmiam(input: impl Into<DateInput>) -> String {
    render(input, "%B %-d, %Y %-I:%M %p")
}

/// Epoch seconds rendered in Pacific time as `07/09/2024 07:27 AM`.
///
/// Non-positive or out-of-range values render as `""`.
pub fn format_epoch_seconds_to_la_mmddyyyy_hhmiam(epoch_seconds: i64) -> String {
    if epoch_seconds <= 0 {
        return String::new();
    }
    match DateTime::from_timestamp(epoch_seconds, 0) {
        Some(utc) => render_naive(&utc.with_timezone(&Los_Angeles).naive_local(), "%m/%d/%Y %I:%M %p"),
        None => String::new(),
    }
}

/// UTC timestamp without fractional seconds, suffixed with the fixed
/// `+07:00` offset the remote API expects.
pub fn to_api_date_format(input: impl Into<DateInput>) -> String {
    match input.into().to_instant() {
        Some(instant) => format!("{}+07:00", instant.format("%Y-%m-%dT%H:%M:%S")),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 9)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn date_only_formats() {
        assert_eq!(format_date_mmddyyyy("2024-07-09"), "07/09/2024");
        assert_eq!(format_date_month_yyyy("2024-07-09"), "July 2024");
        assert_eq!(format_date_month_ddyyyy("2024-07-09"), "July 09, 2024");
        assert_eq!(format_date_month_dyyyy("2024-07-09"), "July 9, 2024");
    }

    #[test]
    fn datetime_formats() {
        assert_eq!(format_datetime_mmddyyyy_hhmiam(at(13, 5)), "07/09/2024 1:05 PM");
        assert_eq!(format_datetime_month_ddyyyy_hhmiam(at(13, 5)), "July 09, 2024 01:05 PM");
        assert_eq!(format_datetime_month_dyyyy_hmiam(at(13, 5)), "July 9, 2024 1:05 PM");
    }

    #[test]
    fn datetime_formats_accept_literal_dates_as_midnight() {
        assert_eq!(format_datetime_month_dyyyy_hmiam("2024-07-09"), "July 9, 2024 12:00 AM");
        assert_eq!(format_datetime_month_ddyyyy_hhmiam("2024-07-09T09:30"), "July 09, 2024 09:30 AM");
    }

    #[test]
    fn midnight_and_noon_are_twelve() {
        assert_eq!(format_datetime_mmddyyyy_hhmiam(at(0, 7)), "07/09/2024 12:07 AM");
        assert_eq!(format_datetime_mmddyyyy_hhmiam(at(12, 0)), "07/09/2024 12:00 PM");
    }

    #[test]
    fn empty_and_invalid_render_blank() {
        assert_eq!(format_date_mmddyyyy(""), "");
        assert_eq!(format_date_month_yyyy("garbage"), "");
        assert_eq!(format_datetime_mmddyyyy_hhmiam("2024-02-30"), "");
        assert_eq!(to_api_date_format(""), "");
    }

    #[test]
    fn epoch_seconds_in_pacific_time() {
        assert_eq!(format_epoch_seconds_to_la_mmddyyyy_hhmiam(0), "");
        assert_eq!(format_epoch_seconds_to_la_mmddyyyy_hhmiam(-5), "");
        // 2024-07-09T14:27:00Z, daylight time.
        assert_eq!(format_epoch_seconds_to_la_mmddyyyy_hhmiam(1_720_535_220), "07/09/2024 07:27 AM");
        // 2024-07-09T07:27:00Z is just after midnight the same day in LA.
        assert_eq!(format_epoch_seconds_to_la_mmddyyyy_hhmiam(1_720_510_020), "07/09/2024 12:27 AM");
        // 2024-01-15T20:05:00Z, standard time.
        assert_eq!(format_epoch_seconds_to_la_mmddyyyy_hhmiam(1_705_349_100), "01/15/2024 12:05 PM");
    }

    #[test]
    fn api_format_drops_millis_and_appends_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 7, 9, 14, 27, 3).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(to_api_date_format(instant), "2024-07-09T14:27:03+07:00");
    }

    proptest! {
        #[test]
        fn twelve_hour_clock(h in 0u32..24, m in 0u32..60) {
            let out = format_datetime_mmddyyyy_hhmiam(at(h, m));
            let hour12 = match h % 12 { 0 => 12, x => x };
            let suffix = if h < 12 { "AM" } else { "PM" };
            prop_assert_eq!(out, format!("07/09/2024 {}:{:02} {}", hour12, m, suffix));
        }
    }
}
