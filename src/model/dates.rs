use chrono::{NaiveDate, NaiveDateTime};

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a caller-supplied date
///
/// Accepts `YYYY-MM-DD` (midnight) or a date with time separated by `T` or a
/// space, with or without seconds.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Format a date the way the AppleScript prelude prints it
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only_is_midnight() {
        let parsed = parse_datetime("2025-10-20").unwrap();
        assert_eq!(format_datetime(&parsed), "2025-10-20T00:00:00");
    }

    #[test]
    fn test_parse_with_time() {
        assert_eq!(
            format_datetime(&parse_datetime("2025-10-20 17:30").unwrap()),
            "2025-10-20T17:30:00"
        );
        assert_eq!(
            format_datetime(&parse_datetime("2025-10-20T08:05:09").unwrap()),
            "2025-10-20T08:05:09"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_none());
        assert!(parse_datetime("2025-13-01").is_none());
        assert!(parse_datetime("").is_none());
    }
}
