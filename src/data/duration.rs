use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60.0 * 1_000_000_000.0),
    ("h", 3_600.0 * 1_000_000_000.0),
];

/// Parse duration strings like "5s", "500ms", "10m", "1h"
///
/// Used for poll interval flags and the recent-events window.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.parse()?;
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3_600 {
        format!("{:.1}h", d.as_secs_f64() / 3_600.0)
    } else if secs >= 60 {
        format!("{:.1}m", d.as_secs_f64() / 60.0)
    } else if secs >= 1 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}

/// Format the age of an epoch-milliseconds timestamp relative to now.
///
/// Returns "-" for timestamps in the future or an unreadable clock.
pub fn format_age(created_at_ms: u64, now_ms: u64) -> String {
    if created_at_ms > now_ms {
        return "-".to_string();
    }
    format_duration(Duration::from_millis(now_ms - created_at_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(
            parse_duration("2.5s").unwrap(),
            Duration::from_millis(2_500)
        );
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3_600));
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_duration(" 5s ").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("five seconds").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
        assert_eq!(format_duration(Duration::from_secs(5_400)), "1.5h");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(1_000, 6_000), "5.0s");
        assert_eq!(format_age(6_000, 1_000), "-");
    }
}
