//! Small shared helpers.

use chrono::{DateTime, SecondsFormat, Utc};

pub const APP_NAME: &str = "blog_backend";

/// RFC 3339 with fixed microsecond precision, so stored timestamps sort
/// lexically in chronological order.
pub fn now_utc_iso() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a path segment as a row id. Anything that is not an integer is
/// treated as an id that matches no row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub fn print_banner() {
    println!("{APP_NAME} v{}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_sort_lexically() {
        let early = format_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let late = format_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert!(early < late);
        assert!(early.ends_with('Z'));
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }
}
