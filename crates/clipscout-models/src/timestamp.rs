//! Timestamp parsing and formatting utilities.
//!
//! Covers the two time formats the pipeline deals with: publish dates coming
//! from discovery/acquisition metadata, and subtitle timecodes.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a publish timestamp into UTC.
///
/// Supports formats:
/// - RFC 3339 (`2024-03-01T12:00:00Z`), as returned by the YouTube Data API
/// - `YYYY-MM-DD`
/// - `YYYYMMDD`, as written by yt-dlp's `upload_date`
///
/// Date-only values resolve to midnight UTC. Returns `None` for anything else.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()?;

    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Whole days elapsed between `published` and `now`, clamped to zero for
/// timestamps in the future.
pub fn age_in_days(published: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    (now - published).num_days().max(0) as u32
}

/// Format seconds as an SRT timecode (`HH:MM:SS,mmm`).
///
/// Negative and non-finite inputs are clamped to zero.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_ms = (seconds * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_published_at_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_published_at("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(
            parse_published_at("2024-03-01T14:30:00+02:00"),
            Some(expected)
        );

        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_published_at("2024-03-01"), Some(midnight));
        assert_eq!(parse_published_at("20240301"), Some(midnight));
    }

    #[test]
    fn test_parse_published_at_garbage() {
        assert_eq!(parse_published_at(""), None);
        assert_eq!(parse_published_at("yesterday"), None);
        assert_eq!(parse_published_at("2024-13-45"), None);
    }

    #[test]
    fn test_age_in_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 6, 0, 0).unwrap();
        let published = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(age_in_days(published, now), 9);
        assert_eq!(age_in_days(now, published), 0);
    }

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_srt_timestamp(61.25), "00:01:01,250");
        assert_eq!(format_srt_timestamp(3723.004), "01:02:03,004");
        assert_eq!(format_srt_timestamp(-4.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(f64::NAN), "00:00:00,000");
    }
}
