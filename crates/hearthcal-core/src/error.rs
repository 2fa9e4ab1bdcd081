//! Error types for the core crate.
//!
//! The expansion engine itself never fails: degenerate input degrades to
//! fewer occurrences. These errors only come out of the strict rule parser
//! and configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for strict rule parsing.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors reported by the strict recurrence rule parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule text was empty.
    #[error("recurrence rule is empty")]
    Empty,

    /// A token had no `=` separator.
    #[error("malformed rule token '{token}': expected KEY=VALUE")]
    MalformedToken { token: String },

    /// No `FREQ` part was given.
    #[error("recurrence rule has no FREQ")]
    MissingFrequency,

    /// `FREQ` was not one of the supported frequencies.
    #[error("unsupported frequency '{value}'")]
    UnknownFrequency { value: String },

    /// A numeric part was not a positive integer.
    #[error("invalid {key} '{value}': expected a positive integer")]
    InvalidNumber { key: &'static str, value: String },

    /// `UNTIL` could not be read as a date or date-time.
    #[error("invalid UNTIL '{value}'")]
    InvalidUntil { value: String },
}

impl RuleError {
    /// Creates a malformed token error.
    pub fn malformed_token(token: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.into(),
        }
    }

    /// Creates an unknown frequency error.
    pub fn unknown_frequency(value: impl Into<String>) -> Self {
        Self::UnknownFrequency {
            value: value.into(),
        }
    }

    /// Creates an invalid number error for the given rule key.
    pub fn invalid_number(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            key,
            value: value.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file was not valid TOML for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_messages() {
        assert_eq!(RuleError::Empty.to_string(), "recurrence rule is empty");
        assert_eq!(
            RuleError::malformed_token("FREQ").to_string(),
            "malformed rule token 'FREQ': expected KEY=VALUE"
        );
        assert_eq!(
            RuleError::unknown_frequency("HOURLY").to_string(),
            "unsupported frequency 'HOURLY'"
        );
        assert_eq!(
            RuleError::invalid_number("INTERVAL", "abc").to_string(),
            "invalid INTERVAL 'abc': expected a positive integer"
        );
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::invalid("max_occurrences must be at least 1").to_string(),
            "invalid config: max_occurrences must be at least 1"
        );

        let err = ConfigError::Read {
            path: PathBuf::from("/etc/hearthcal/config.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read config /etc/hearthcal/config.toml: not found"
        );
    }
}
