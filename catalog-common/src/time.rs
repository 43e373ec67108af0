//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a SQLite `CURRENT_TIMESTAMP` value (`YYYY-MM-DD HH:MM:SS`, UTC) or RFC 3339
pub fn parse_db_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // After 2000-01-01, before 2100-01-01
        assert!(timestamp.timestamp() > 946_684_800);
        assert!(timestamp.timestamp() < 4_102_444_800);
    }

    #[test]
    fn test_now_millis_matches_now() {
        let before = now().timestamp_millis();
        let millis = now_millis();
        assert!(millis >= before);
    }

    #[test]
    fn test_parse_sqlite_timestamp() {
        let parsed = parse_db_timestamp("2024-03-05 10:20:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:20:30+00:00");
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let parsed = parse_db_timestamp("2024-03-05T10:20:30+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T08:20:30+00:00");
    }

    #[test]
    fn test_parse_garbage_timestamp() {
        assert!(parse_db_timestamp("yesterday").is_none());
    }
}
