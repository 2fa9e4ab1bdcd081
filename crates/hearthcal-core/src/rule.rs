//! Recurrence rules.
//!
//! Rules are persisted as a restricted subset of RRULE text:
//! `KEY=VALUE` tokens joined by `;`, e.g. `FREQ=WEEKLY;INTERVAL=2;COUNT=10`.
//! Recognised keys are `FREQ`, `INTERVAL`, `BYDAY`, `COUNT` and `UNTIL`;
//! anything else is ignored.
//!
//! Two parsers are provided:
//! - [`parse_rule`] is what the expander uses. It never fails: unknown
//!   frequencies fall back to daily, bad numbers are clamped or dropped,
//!   malformed tokens are skipped.
//! - [`RecurrenceRule::from_str`] rejects all of the above and is meant for
//!   validating rule text before it is stored.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RuleError, RuleResult};
use crate::time::{format_datetime, parse_datetime};

/// Rule choices offered when editing an event, with their labels.
///
/// The empty rule is "does not repeat".
pub const RECURRENCE_PRESETS: &[(&str, &str)] = &[
    ("", "Does not repeat"),
    ("FREQ=DAILY", "Daily"),
    ("FREQ=WEEKLY", "Weekly"),
    ("FREQ=MONTHLY", "Monthly"),
    ("FREQ=YEARLY", "Yearly"),
];

/// How often a series repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parses the `FREQ` literal. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns the `FREQ` literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// The one-word description used when the interval is 1.
    pub fn adverb(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// The plural unit name, as in "every 3 days".
    pub fn plural_unit(&self) -> &'static str {
        match self {
            Self::Daily => "days",
            Self::Weekly => "weeks",
            Self::Monthly => "months",
            Self::Yearly => "years",
        }
    }

    /// Advances `from` by `steps` units of this frequency.
    ///
    /// Month and year steps keep the day of month where the target month
    /// has it and clamp to the month's last day otherwise. Returns `None`
    /// when the result leaves the representable range.
    pub fn advance(&self, from: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Self::Daily => from.checked_add_days(Days::new(u64::from(steps))),
            Self::Weekly => from.checked_add_days(Days::new(u64::from(steps) * 7)),
            Self::Monthly => from.checked_add_months(Months::new(steps)),
            Self::Yearly => from.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Unit of repetition.
    pub frequency: Frequency,
    /// Step size in units of `frequency`. Always at least 1.
    pub interval: u32,
    /// Raw `BYDAY` tokens. Kept for round trips; expansion ignores them.
    pub by_day: Vec<String>,
    /// Maximum number of instances, counted from the series start.
    pub count: Option<u32>,
    /// Inline end of the series.
    pub until: Option<NaiveDateTime>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self::new(Frequency::Daily)
    }
}

impl RecurrenceRule {
    /// Creates a rule repeating every single unit of `frequency`.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_day: Vec::new(),
            count: None,
            until: None,
        }
    }

    /// Builder method to set the interval. Zero is stored as 1.
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Builder method to set the `BYDAY` tokens.
    pub fn with_by_day<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_day = days.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the instance count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count).filter(|c| *c > 0);
        self
    }

    /// Builder method to set the inline end date.
    pub fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }

    /// Start of the `index`-th instance of a series beginning at `series_start`.
    ///
    /// Instances are always computed from the series start rather than from
    /// the previous instance, so a monthly series starting on the 31st
    /// lands on the 31st again whenever the month has one.
    pub fn nth_start(&self, series_start: NaiveDateTime, index: u32) -> Option<NaiveDateTime> {
        let steps = index.checked_mul(self.interval)?;
        self.frequency.advance(series_start, steps)
    }

    /// Maps plain two-letter `BYDAY` tokens to weekdays.
    ///
    /// Tokens with ordinal prefixes (`1MO`, `-1FR`) or unknown names are
    /// skipped.
    pub fn weekdays(&self) -> Vec<Weekday> {
        self.by_day
            .iter()
            .filter_map(|token| match token.as_str() {
                "MO" => Some(Weekday::Mon),
                "TU" => Some(Weekday::Tue),
                "WE" => Some(Weekday::Wed),
                "TH" => Some(Weekday::Thu),
                "FR" => Some(Weekday::Fri),
                "SA" => Some(Weekday::Sat),
                "SU" => Some(Weekday::Sun),
                _ => None,
            })
            .collect()
    }

    /// Human-readable summary, e.g. "Weekly" or "Every 2 years".
    pub fn describe(&self) -> String {
        if self.interval > 1 {
            format!("Every {} {}", self.interval, self.frequency.plural_unit())
        } else {
            self.frequency.adverb().to_string()
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_rule(&RuleParts::from(self)))
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> RuleResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let mut frequency = None;
        let mut rule = Self::default();

        for token in s.split(';').filter(|t| !t.trim().is_empty()) {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| RuleError::malformed_token(token))?;
            let value = value.trim();

            match key.trim() {
                "FREQ" => {
                    frequency = Some(
                        Frequency::parse(value)
                            .ok_or_else(|| RuleError::unknown_frequency(value))?,
                    );
                }
                "INTERVAL" => rule.interval = strict_positive("INTERVAL", value)?,
                "COUNT" => rule.count = Some(strict_positive("COUNT", value)?),
                "UNTIL" => {
                    rule.until = Some(parse_datetime(value).ok_or_else(|| {
                        RuleError::InvalidUntil {
                            value: value.to_string(),
                        }
                    })?);
                }
                "BYDAY" => rule.by_day = split_by_day(value),
                _ => {}
            }
        }

        rule.frequency = frequency.ok_or(RuleError::MissingFrequency)?;
        Ok(rule)
    }
}

fn strict_positive(key: &'static str, value: &str) -> RuleResult<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| RuleError::invalid_number(key, value))
}

fn split_by_day(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses rule text leniently.
///
/// Returns `None` only for empty or blank text, meaning "does not repeat".
/// Anything else produces a rule:
/// - an unknown or missing `FREQ` means daily
/// - a non-numeric or zero `INTERVAL` means 1
/// - a non-numeric or zero `COUNT` means no count
/// - an unreadable `UNTIL` means no inline end
/// - tokens without `=` and unknown keys are skipped
///
/// When a key repeats, the last one wins.
pub fn parse_rule(text: &str) -> Option<RecurrenceRule> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut rule = RecurrenceRule::default();

    for token in text.split(';').filter(|t| !t.trim().is_empty()) {
        let Some((key, value)) = token.split_once('=') else {
            debug!(token, "Skipping rule token without '='");
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "FREQ" => {
                rule.frequency = Frequency::parse(value).unwrap_or_else(|| {
                    debug!(value, "Unknown FREQ, falling back to DAILY");
                    Frequency::Daily
                });
            }
            "INTERVAL" => {
                rule.interval = value.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or_else(|| {
                    debug!(value, "Invalid INTERVAL, clamping to 1");
                    1
                });
            }
            "COUNT" => {
                rule.count = value.parse::<u32>().ok().filter(|n| *n > 0);
                if rule.count.is_none() {
                    debug!(value, "Invalid COUNT, ignoring");
                }
            }
            "UNTIL" => {
                rule.until = parse_datetime(value);
                if rule.until.is_none() {
                    debug!(value, "Invalid UNTIL, ignoring");
                }
            }
            "BYDAY" => rule.by_day = split_by_day(value),
            _ => {}
        }
    }

    Some(rule)
}

/// A possibly incomplete rule, as edited before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleParts {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub by_day: Vec<String>,
    pub count: Option<u32>,
    pub until: Option<NaiveDateTime>,
}

impl From<&RecurrenceRule> for RuleParts {
    fn from(rule: &RecurrenceRule) -> Self {
        Self {
            frequency: Some(rule.frequency),
            interval: Some(rule.interval),
            by_day: rule.by_day.clone(),
            count: rule.count,
            until: rule.until,
        }
    }
}

/// Serializes rule parts back to rule text.
///
/// The output is compact: `INTERVAL` is left out when it is 1 or missing,
/// `BYDAY` when it is empty, `COUNT` when it is missing or zero. `UNTIL` is
/// written as an ISO timestamp with a `Z` suffix.
pub fn build_rule(parts: &RuleParts) -> String {
    let mut segments = Vec::new();

    if let Some(frequency) = parts.frequency {
        segments.push(format!("FREQ={}", frequency));
    }
    if let Some(interval) = parts.interval.filter(|i| *i > 1) {
        segments.push(format!("INTERVAL={}", interval));
    }
    if !parts.by_day.is_empty() {
        segments.push(format!("BYDAY={}", parts.by_day.join(",")));
    }
    if let Some(count) = parts.count.filter(|c| *c > 0) {
        segments.push(format!("COUNT={}", count));
    }
    if let Some(until) = parts.until {
        segments.push(format!("UNTIL={}Z", format_datetime(&until)));
    }

    segments.join(";")
}

/// Describes stored rule text for display.
///
/// Missing or blank text reads "Does not repeat".
pub fn describe_rule(text: Option<&str>) -> String {
    text.and_then(parse_rule)
        .map(|rule| rule.describe())
        .unwrap_or_else(|| "Does not repeat".to_string())
}
