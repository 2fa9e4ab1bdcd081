//! Core types for hearthcal: events, recurrence rules, time windows and
//! occurrence expansion.

pub mod config;
pub mod error;
pub mod event;
pub mod expand;
pub mod filter;
pub mod rule;
pub mod time;
pub mod tracing;

pub use config::{DEFAULT_HORIZON_MONTHS, DEFAULT_MAX_OCCURRENCES, ExpansionConfig};
pub use error::{ConfigError, ConfigResult, RuleError, RuleResult};
pub use event::{Category, EventCategory, Occurrence, StoredEvent, reminder_label};
pub use expand::{Expander, SeriesWalk, StopReason, expand_many_events, expand_single_event};
pub use filter::{CategoryFilter, group_by_day, occurrences_on, split_all_day};
pub use rule::{Frequency, RecurrenceRule, RuleParts, build_rule, describe_rule, parse_rule};
pub use time::{CalendarView, TimeWindow, WeekStart, format_datetime, parse_datetime};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
