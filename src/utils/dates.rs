//! Timestamp parsing and provider date formats.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

use crate::models::DateRange;

/// Offset formats seen in provider payloads that RFC 3339 rejects,
/// e.g. `2024-01-05T14:03:00+0000`.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Parse a provider publication timestamp into an absolute instant.
///
/// Accepts RFC 3339, ISO 8601 with a colon-less offset, naive date-times
/// (read as UTC) and bare calendar dates (midnight UTC).
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date (`YYYY-MM-DD`, UTC) for display.
///
/// Unparsable timestamps fall back to the text before any `T`.
pub fn calendar_date(raw: &str) -> String {
    match parse_published_at(raw) {
        Some(instant) => iso_date(instant.date_naive()),
        None => raw.split('T').next().unwrap_or_default().to_string(),
    }
}

/// `YYYY-MM-DD`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYYMMDD`
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Fill the open ends of a range with a provider's recency window.
///
/// The end defaults to `today`; the start defaults to `lookback_days` before
/// the end.
pub fn window_or_default(range: &DateRange, today: NaiveDate, lookback_days: u64) -> (NaiveDate, NaiveDate) {
    let end = range.end.unwrap_or(today);
    let start = range
        .start
        .unwrap_or_else(|| end.checked_sub_days(Days::new(lookback_days)).unwrap_or(end));
    (start, end)
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_published_at("2024-03-10T08:15:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 10, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_colonless_offset() {
        let parsed = parse_published_at("2024-03-10T08:15:00+0200").unwrap();
        assert_eq!(parsed.hour(), 6);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert!(parse_published_at("2024-03-10T08:15:00").is_some());
        let midnight = parse_published_at("2024-03-10").unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_published_at("").is_none());
        assert!(parse_published_at("yesterday").is_none());
    }

    #[test]
    fn test_calendar_date_uses_utc() {
        assert_eq!(calendar_date("2024-03-10T23:30:00-0500"), "2024-03-11");
        assert_eq!(calendar_date("not a dateTmore"), "not a date");
    }

    #[test]
    fn test_formats() {
        assert_eq!(iso_date(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(compact_date(date(2024, 1, 5)), "20240105");
    }

    #[test]
    fn test_window_defaults() {
        let today = date(2024, 6, 15);

        let open = window_or_default(&DateRange::default(), today, 7);
        assert_eq!(open, (date(2024, 6, 8), today));

        let same_day = window_or_default(&DateRange::default(), today, 0);
        assert_eq!(same_day, (today, today));

        let fixed = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert_eq!(window_or_default(&fixed, today, 7), (date(2024, 1, 1), date(2024, 1, 31)));

        let end_only = DateRange::new(None, Some(date(2024, 2, 10)));
        assert_eq!(window_or_default(&end_only, today, 7).0, date(2024, 2, 3));
    }
}
