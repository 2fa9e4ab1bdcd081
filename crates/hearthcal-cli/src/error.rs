//! CLI error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use hearthcal_core::{ConfigError, RuleError};

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to stdout failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The event export is not a JSON array of events.
    #[error("invalid event data: {0}")]
    Events(#[source] serde_json::Error),

    /// Rendering JSON output failed.
    #[error("failed to render JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dumping the configuration failed.
    #[error("failed to serialize config: {0}")]
    ConfigDump(#[from] toml::ser::Error),

    /// A date argument could not be read.
    #[error("invalid date '{value}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidDate { value: String },

    /// The query window ends before it starts.
    #[error("--to ({to}) is before --from ({from})")]
    InvertedRange { from: String, to: String },

    /// Rule text failed strict validation.
    #[error("invalid rule: {0}")]
    Rule(#[from] RuleError),
}

impl CliError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CliError::invalid_date("tomorrow").to_string(),
            "invalid date 'tomorrow': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM"
        );
        assert_eq!(
            CliError::from(RuleError::Empty).to_string(),
            format!("invalid rule: {}", RuleError::Empty)
        );
    }

    #[test]
    fn read_error_names_the_file() {
        let err = CliError::Read {
            path: PathBuf::from("/tmp/events.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/events.json: not found");
    }
}
