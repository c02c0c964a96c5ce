//! Fire-time parsing for deferred comments
//!
//! Accepts the formats an operator is likely to type:
//! - Absolute RFC 3339 timestamps: "2026-08-06T15:00:00Z"
//! - Relative durations: "2m", "1h 30m", "45s"
//! - Natural language: "tomorrow", "next friday 10am"

use chrono::{DateTime, Duration, Utc};

use crate::error::FlockError;
use crate::Result;

/// Parse a fire-time string into a UTC instant.
///
/// Relative durations are measured from now.
///
/// # Errors
///
/// Returns `InvalidInput` when the string is empty or matches none of the
/// supported formats.
pub fn parse_fire_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FlockError::InvalidInput(
            "Fire time cannot be empty".to_string(),
        ));
    }

    if let Ok(absolute) = DateTime::parse_from_rfc3339(input) {
        return Ok(absolute.with_timezone(&Utc));
    }

    if let Ok(duration) = parse_duration(input) {
        return Ok(Utc::now() + duration);
    }

    if let Ok(dt) = parse_natural_language(input) {
        return Ok(dt);
    }

    Err(FlockError::InvalidInput(format!(
        "Could not parse fire time: {}",
        input
    )))
}

fn parse_duration(input: &str) -> Result<Duration> {
    let std_duration = humantime::parse_duration(input)
        .map_err(|_| FlockError::InvalidInput(format!("Could not parse duration: {}", input)))?;
    let seconds = std_duration.as_secs() as i64;
    Duration::try_seconds(seconds)
        .ok_or_else(|| FlockError::InvalidInput("Duration out of range".to_string()))
}

fn parse_natural_language(input: &str) -> Result<DateTime<Utc>> {
    chrono_english::parse_date_string(input, Utc::now(), chrono_english::Dialect::Us)
        .map_err(|e| FlockError::InvalidInput(format!("Could not parse time: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_absolute() {
        let parsed = parse_fire_time("2026-08-06T15:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-06T15:00:00+00:00");
    }

    #[test]
    fn test_rfc3339_with_offset_normalizes_to_utc() {
        let parsed = parse_fire_time("2026-08-06T17:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-06T15:00:00+00:00");
    }

    #[test]
    fn test_relative_minutes() {
        let parsed = parse_fire_time("30m").unwrap();
        let diff = (parsed - Utc::now()).num_minutes();
        assert!((29..=31).contains(&diff), "expected ~30 minutes, got {}", diff);
    }

    #[test]
    fn test_relative_compound() {
        let parsed = parse_fire_time("1h 30m").unwrap();
        let diff = (parsed - Utc::now()).num_minutes();
        assert!((89..=91).contains(&diff), "expected ~90 minutes, got {}", diff);
    }

    #[test]
    fn test_natural_language_tomorrow() {
        let parsed = parse_fire_time("tomorrow").unwrap();
        let diff = (parsed - Utc::now()).num_hours();
        assert!((20..=28).contains(&diff), "expected ~24 hours, got {}", diff);
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(parse_fire_time("").is_err());
        assert!(parse_fire_time("   ").is_err());
    }

    #[test]
    fn test_gibberish_is_rejected() {
        assert!(parse_fire_time("whenever you feel like it, champ").is_err());
    }
}
