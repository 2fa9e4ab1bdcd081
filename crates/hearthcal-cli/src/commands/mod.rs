//! Command implementations.
//!
//! Every command writes to the given writer so it can be exercised in tests.

pub mod config;
pub mod expand;
pub mod rule;
pub mod view;

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::debug;

use hearthcal_core::{StoredEvent, parse_datetime};

use crate::error::{CliError, CliResult};

/// Reads a JSON array of stored events from `path`, or stdin for `-`.
pub fn load_events(path: &Path) -> CliResult<Vec<StoredEvent>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };

    let events = parse_events(&content)?;
    debug!(count = events.len(), path = %path.display(), "Loaded events");
    Ok(events)
}

/// Parses a JSON array of stored events.
pub fn parse_events(content: &str) -> CliResult<Vec<StoredEvent>> {
    serde_json::from_str(content).map_err(CliError::Events)
}

/// Reads a date or date-time argument. Bare dates mean midnight.
pub fn parse_date_arg(value: &str) -> CliResult<NaiveDateTime> {
    parse_datetime(value).ok_or_else(|| CliError::invalid_date(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn date_args() {
        assert_eq!(
            parse_date_arg("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(
            parse_date_arg("2024-03-01T08:30").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
        assert!(matches!(
            parse_date_arg("next tuesday"),
            Err(CliError::InvalidDate { .. })
        ));
    }

    #[test]
    fn events_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a","title":"A","start_time":"2024-03-01T09:00:00","end_time":"2024-03-01T10:00:00"}}]"#
        )
        .unwrap();

        let events = load_events(file.path()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "a");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_events(&dir.path().join("events.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn not_an_array() {
        assert!(matches!(
            parse_events(r#"{"id":"a"}"#),
            Err(CliError::Events(_))
        ));
    }
}
