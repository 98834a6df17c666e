//! CLI argument validation functions
//!
//! Value parsers for arguments whose constraints clap cannot express on its own.

use crate::config::validation::MAX_RETRY_INTERVAL;
use std::fs;
use std::path::PathBuf;

/// Validate the polling interval in seconds (1..=86400)
pub fn validate_interval(interval_str: &str) -> Result<u64, String> {
    let interval: u64 = interval_str.trim().parse().map_err(|_| {
        format!(
            "Interval must be a whole number of seconds between 1 and {}, got: '{}'",
            MAX_RETRY_INTERVAL, interval_str
        )
    })?;

    if interval == 0 || interval > MAX_RETRY_INTERVAL {
        return Err(format!(
            "Interval must be between 1 and {} seconds, got: {}",
            MAX_RETRY_INTERVAL, interval
        ));
    }

    Ok(interval)
}

/// Validate the starting cursor.
///
/// Accepts unix seconds (`1700000000`) or an RFC 3339 timestamp
/// (`2026-10-01T00:00:00Z`); either way the result is unix seconds, never
/// negative.
pub fn validate_from_date(from_date_str: &str) -> Result<i64, String> {
    let value = from_date_str.trim();

    let seconds = match value.parse::<i64>() {
        Ok(seconds) => seconds,
        Err(_) => value
            .parse::<jiff::Timestamp>()
            .map(|ts| ts.as_second())
            .map_err(|_| {
                format!(
                    "From-date must be unix seconds or an RFC 3339 timestamp, got: '{}'",
                    from_date_str
                )
            })?,
    };

    if seconds < 0 {
        return Err(format!("From-date must not be before 1970-01-01, got: {}", seconds));
    }

    Ok(seconds)
}

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_interval_validation_valid() {
        for (input, expected) in [("1", 1), ("600", 600), (" 60 ", 60), ("86400", 86_400)] {
            assert_eq!(validate_interval(input), Ok(expected), "Interval {} should be valid", input);
        }
    }

    #[test]
    fn test_interval_validation_invalid() {
        let invalid = ["0", "86401", "-5", "abc", "", "1.5"];

        for interval_str in invalid {
            let result = validate_interval(interval_str);
            assert!(result.is_err(), "Interval '{}' should be invalid", interval_str);
        }
    }

    #[test]
    fn test_from_date_unix_seconds() {
        assert_eq!(validate_from_date("0"), Ok(0));
        assert_eq!(validate_from_date("1700000000"), Ok(1_700_000_000));
    }

    #[test]
    fn test_from_date_rfc3339() {
        assert_eq!(validate_from_date("1970-01-01T00:01:00Z"), Ok(60));
        assert_eq!(validate_from_date("2023-11-14T22:13:20Z"), Ok(1_700_000_000));
    }

    #[test]
    fn test_from_date_invalid() {
        for input in ["-1", "yesterday", "", "1970-01-01"] {
            assert!(validate_from_date(input).is_err(), "From-date '{}' should be invalid", input);
        }
    }

    #[test]
    fn test_config_file_path_validation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[poller]\nretry_interval = 60").unwrap();

        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());

        let dir = tempfile::tempdir().unwrap();
        let err = validate_config_file_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not a file"));
    }

    proptest! {
        #[test]
        fn property_interval_accepts_whole_range(interval in 1u64..=MAX_RETRY_INTERVAL) {
            prop_assert_eq!(validate_interval(&interval.to_string()), Ok(interval));
        }

        #[test]
        fn property_from_date_round_trips_seconds(seconds in 0i64..4_000_000_000) {
            prop_assert_eq!(validate_from_date(&seconds.to_string()), Ok(seconds));
        }
    }
}
