//! Timestamp helpers.

use chrono::Utc;
use std::time::Instant;

/// Returns the current UTC time as an RFC 3339 string with microsecond precision.
///
/// Format: `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`
///
/// # Examples
///
/// ```
/// use autoreel::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// assert!(ts.ends_with("+00:00"));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Milliseconds elapsed since `start`, as a float.
#[must_use]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_iso_timestamp_parses_back() {
        let ts = iso_timestamp();
        let parsed = DateTime::parse_from_rfc3339(&ts);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_elapsed_ms_is_non_negative() {
        let start = Instant::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(elapsed_ms(start) >= 5.0);
    }
}
