//! Date range calculation for named and custom reporting periods.
//!
//! Every function takes the reference day explicitly so callers (and tests)
//! control what "today" means; nothing here reads the system clock.

use crate::error::{ReportError, Result};
use crate::model::DateRange;
use chrono::{Datelike, Duration, NaiveDate};

pub fn today(now: NaiveDate) -> DateRange {
    DateRange::days(now, now)
}

pub fn yesterday(now: NaiveDate) -> DateRange {
    let day = now - Duration::days(1);
    DateRange::days(day, day)
}

/// Monday through Sunday of the ISO week containing `now`.
pub fn this_week(now: NaiveDate) -> DateRange {
    let monday = now - Duration::days(now.weekday().num_days_from_monday() as i64);
    DateRange::days(monday, monday + Duration::days(6))
}

pub fn last_week(now: NaiveDate) -> DateRange {
    let monday = now - Duration::days(now.weekday().num_days_from_monday() as i64 + 7);
    DateRange::days(monday, monday + Duration::days(6))
}

/// Parse two `YYYY-MM-DD` dates into an inclusive range.
pub fn custom_range(from: &str, to: &str) -> Result<DateRange> {
    let first = parse_date(from)?;
    let last = parse_date(to)?;
    if first > last {
        return Err(ReportError::InvalidDate(format!(
            "start date {from} is after end date {to}"
        )));
    }
    Ok(DateRange::days(first, last))
}

/// Inclusive window of the last `n` days ending today.
pub fn last_n_days(now: NaiveDate, n: i64) -> Result<DateRange> {
    if n < 1 {
        return Err(ReportError::InvalidArgument(format!(
            "day count must be at least 1, got {n}"
        )));
    }
    Ok(DateRange::days(now - Duration::days(n - 1), now))
}

/// Full calendar month in the given year.
pub fn month_range(year: i32, month: u32) -> Result<DateRange> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidArgument(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ReportError::InvalidDate(format!("no such month: {year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ReportError::InvalidDate(format!("no such month: {year}-{month:02}")))?;
    Ok(DateRange::days(first, next - Duration::days(1)))
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| ReportError::InvalidDate(format!("'{input}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_is_a_single_day() {
        let range = today(day(2025, 7, 4));
        assert_eq!(range.start.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-07-04 00:00:00");
        assert_eq!(range.end.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-07-04 23:59:59");
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let range = yesterday(day(2025, 3, 1));
        assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2025-02-28");
        assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2025-02-28");
    }

    #[test]
    fn this_week_starts_monday_ends_sunday_for_any_now() {
        // 2025-07-07 is a Monday; check every day of that week.
        for offset in 0..7 {
            let now = day(2025, 7, 7) + Duration::days(offset);
            let range = this_week(now);
            assert_eq!(range.start.weekday(), Weekday::Mon);
            assert_eq!(range.end.weekday(), Weekday::Sun);
            assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2025-07-07");
            assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2025-07-13");
        }
    }

    #[test]
    fn last_week_is_the_previous_iso_week() {
        let range = last_week(day(2025, 7, 9));
        assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2025-06-30");
        assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2025-07-06");
        assert_eq!(range.start.weekday(), Weekday::Mon);
        assert_eq!(range.end.weekday(), Weekday::Sun);
    }

    #[test]
    fn custom_range_rejects_inverted_bounds() {
        let err = custom_range("2025-05-10", "2025-05-01").unwrap_err();
        assert!(matches!(err, ReportError::InvalidDate(_)));
    }

    #[test]
    fn custom_range_rejects_malformed_dates() {
        assert!(matches!(
            custom_range("not-a-date", "2025-05-01").unwrap_err(),
            ReportError::InvalidDate(_)
        ));
        assert!(matches!(
            custom_range("2025-05-01", "2025-13-40").unwrap_err(),
            ReportError::InvalidDate(_)
        ));
    }

    #[test]
    fn last_n_days_includes_today() {
        let range = last_n_days(day(2025, 7, 10), 7).unwrap();
        assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2025-07-04");
        assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2025-07-10");
    }

    #[test]
    fn last_n_days_rejects_non_positive_counts() {
        assert!(matches!(
            last_n_days(day(2025, 7, 10), 0).unwrap_err(),
            ReportError::InvalidArgument(_)
        ));
        assert!(matches!(
            last_n_days(day(2025, 7, 10), -3).unwrap_err(),
            ReportError::InvalidArgument(_)
        ));
    }

    #[test]
    fn month_range_handles_leap_february_and_december() {
        let feb = month_range(2024, 2).unwrap();
        assert_eq!(feb.end.format("%Y-%m-%d").to_string(), "2024-02-29");

        let dec = month_range(2025, 12).unwrap();
        assert_eq!(dec.start.format("%Y-%m-%d").to_string(), "2025-12-01");
        assert_eq!(dec.end.format("%Y-%m-%d").to_string(), "2025-12-31");
    }

    #[test]
    fn month_range_rejects_out_of_domain_months() {
        assert!(matches!(month_range(2025, 0).unwrap_err(), ReportError::InvalidArgument(_)));
        assert!(matches!(month_range(2025, 13).unwrap_err(), ReportError::InvalidArgument(_)));
    }

    #[test]
    fn every_calculator_output_is_ordered() {
        let now = day(2025, 1, 1);
        for range in [
            today(now),
            yesterday(now),
            this_week(now),
            last_week(now),
            last_n_days(now, 30).unwrap(),
            month_range(2025, 6).unwrap(),
            custom_range("2025-01-01", "2025-01-31").unwrap(),
        ] {
            assert!(range.start <= range.end);
        }
    }
}
