//! Expansion configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default safety cap on instances walked per recurring event.
pub const DEFAULT_MAX_OCCURRENCES: usize = 100;

/// Default lookahead past the query window for series with no end.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Limits applied while expanding recurring events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Maximum number of instances walked per recurring event, whether or
    /// not they land in the window.
    pub max_occurrences: usize,

    /// How far past the window end an unterminated series may run, in
    /// calendar months.
    pub horizon_months: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

impl ExpansionConfig {
    /// Builder: set the per-event safety cap.
    pub fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }

    /// Builder: set the default horizon.
    pub fn with_horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }

    /// Checks that the settings can drive an expansion.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_occurrences == 0 {
            return Err(ConfigError::invalid("max_occurrences must be at least 1"));
        }
        if self.horizon_months == 0 {
            return Err(ConfigError::invalid("horizon_months must be at least 1"));
        }
        Ok(())
    }
}
