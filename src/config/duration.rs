//! Duration strings used in configuration ("7d", "24h", "30m", "45s").

use chrono::Duration;

use crate::error::{DetectError, Result};

/// Parse a duration string like "7d", "24h", "30m".
///
/// A bare number is read as seconds. Negative values are rejected.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let text = value.trim().to_lowercase();
    let invalid = || DetectError::InvalidDuration {
        value: value.to_string(),
    };

    let (digits, unit): (&str, fn(i64) -> Option<Duration>) =
        if let Some(days) = text.strip_suffix('d') {
            (days, Duration::try_days)
        } else if let Some(hours) = text.strip_suffix('h') {
            (hours, Duration::try_hours)
        } else if let Some(mins) = text.strip_suffix('m') {
            (mins, Duration::try_minutes)
        } else if let Some(secs) = text.strip_suffix('s') {
            (secs, Duration::try_seconds)
        } else {
            (text.as_str(), Duration::try_seconds)
        };

    let n: i64 = digits.trim().parse().map_err(|_| invalid())?;
    if n < 0 {
        return Err(invalid());
    }
    unit(n).ok_or_else(invalid)
}

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();

    if secs >= 86400 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
