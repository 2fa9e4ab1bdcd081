//! Event types.
//!
//! This module provides the records the expansion engine works on:
//! - [`StoredEvent`]: an event definition as persisted, possibly recurring
//! - [`Occurrence`]: one concrete, dated instance of a stored event
//! - [`Category`] and [`EventCategory`]: household categories and the
//!   legacy fixed categories used for colouring

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::rule::{RecurrenceRule, describe_rule, parse_rule};
use crate::time::{format_datetime, serde_datetime};

/// Palette offered when creating a category.
pub const DEFAULT_CATEGORY_COLORS: &[&str] = &[
    "#3B82F6", // Blue
    "#8B5CF6", // Purple
    "#22C55E", // Green
    "#EF4444", // Red
    "#F59E0B", // Amber
    "#EC4899", // Pink
    "#06B6D4", // Cyan
    "#6B7280", // Gray
];

/// Reminder offsets offered when editing an event, in minutes before start.
pub const REMINDER_OPTIONS: &[(u32, &str)] = &[
    (0, "At time of event"),
    (15, "15 minutes before"),
    (30, "30 minutes before"),
    (60, "1 hour before"),
    (1440, "1 day before"),
];

/// Label for a reminder offset, from [`REMINDER_OPTIONS`] when listed.
pub fn reminder_label(minutes: u32) -> String {
    REMINDER_OPTIONS
        .iter()
        .find(|(offset, _)| *offset == minutes)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{} minutes before", minutes))
}

/// The fixed category set that predates household categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Personal,
    Work,
    Family,
    Health,
    #[default]
    Other,
}

impl EventCategory {
    /// Returns the display colour for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Personal => "#3B82F6",
            Self::Work => "#8B5CF6",
            Self::Family => "#22C55E",
            Self::Health => "#EF4444",
            Self::Other => "#6B7280",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Family => "Family",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

/// A household-defined category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub household_id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, with = "serde_datetime::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl Category {
    /// Creates a new category with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            household_id: String::new(),
            name: name.into(),
            color: color.into(),
            icon: None,
            is_default: false,
            created_at: None,
        }
    }
}

/// An event definition as persisted.
///
/// `start_time`/`end_time` describe the first instance. When
/// `recurrence_rule` holds non-blank text the event repeats according to it;
/// otherwise it happens exactly once. Everything apart from the timing and
/// recurrence fields is payload that expansion copies onto each occurrence
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Unique identifier.
    pub id: String,
    #[serde(default)]
    pub household_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Start of the first instance.
    #[serde(with = "serde_datetime")]
    pub start_time: NaiveDateTime,
    /// End of the first instance.
    #[serde(with = "serde_datetime")]
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub is_all_day: bool,
    /// Legacy category, used for colouring when no explicit colour is set.
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Rule text, see [`crate::rule`].
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    /// No instance may start at or after this value.
    #[serde(default, with = "serde_datetime::option")]
    pub recurrence_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub reminder_minutes: Vec<u32>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, with = "serde_datetime::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "serde_datetime::option")]
    pub updated_at: Option<NaiveDateTime>,
}

impl StoredEvent {
    /// Creates a one-off event with required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            household_id: String::new(),
            title: title.into(),
            description: String::new(),
            start_time,
            end_time,
            is_all_day: false,
            category: EventCategory::default(),
            category_id: None,
            color: None,
            recurrence_rule: None,
            recurrence_end: None,
            reminder_minutes: Vec::new(),
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns true if the event carries rule text.
    ///
    /// Blank text counts as no rule.
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }

    /// Parses the event's rule leniently.
    pub fn rule(&self) -> Option<RecurrenceRule> {
        self.recurrence_rule.as_deref().and_then(parse_rule)
    }

    /// Human-readable recurrence summary.
    pub fn describe_recurrence(&self) -> String {
        describe_rule(self.recurrence_rule.as_deref())
    }

    /// Labels for the event's reminders, in stored order.
    pub fn reminder_labels(&self) -> Vec<String> {
        self.reminder_minutes
            .iter()
            .map(|minutes| reminder_label(*minutes))
            .collect()
    }

    /// Length of every instance.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Builder method to set the recurrence rule text.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    /// Builder method to set the recurrence end.
    pub fn with_recurrence_end(mut self, end: NaiveDateTime) -> Self {
        self.recurrence_end = Some(end);
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to mark as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    /// Builder method to set the legacy category.
    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder method to set the household category.
    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Builder method to set an explicit colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder method to set reminder offsets.
    pub fn with_reminders(mut self, minutes: Vec<u32>) -> Self {
        self.reminder_minutes = minutes;
        self
    }
}

/// One concrete instance of a stored event.
///
/// Serializes flat: the stored event's fields followed by the instance
/// timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// The event this instance was produced from, copied verbatim.
    #[serde(flatten)]
    pub event: StoredEvent,
    /// Start of this instance.
    #[serde(with = "serde_datetime")]
    pub occurrence_start: NaiveDateTime,
    /// End of this instance.
    #[serde(with = "serde_datetime")]
    pub occurrence_end: NaiveDateTime,
    /// Whether the instance came from a recurrence rule.
    pub is_recurring: bool,
    /// Id of the originating stored event.
    pub source_event_id: String,
}

impl Occurrence {
    /// The single occurrence of a one-off event.
    pub fn single(event: &StoredEvent) -> Self {
        Self {
            event: event.clone(),
            occurrence_start: event.start_time,
            occurrence_end: event.end_time,
            is_recurring: false,
            source_event_id: event.id.clone(),
        }
    }

    /// An instance of a recurring series.
    pub fn instance(event: &StoredEvent, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            event: event.clone(),
            occurrence_start: start,
            occurrence_end: end,
            is_recurring: true,
            source_event_id: event.id.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.event.title
    }

    pub fn is_all_day(&self) -> bool {
        self.event.is_all_day
    }

    pub fn category_id(&self) -> Option<&str> {
        self.event.category_id.as_deref()
    }

    /// Calendar date this instance starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.occurrence_start.date()
    }

    pub fn duration(&self) -> Duration {
        self.occurrence_end - self.occurrence_start
    }

    /// Key that identifies this instance among all rendered occurrences.
    pub fn instance_key(&self) -> String {
        format!(
            "{}-{}",
            self.source_event_id,
            format_datetime(&self.occurrence_start)
        )
    }

    /// The colour to draw this instance with: the event's own colour, or
    /// the legacy category colour when none is set.
    pub fn display_color(&self) -> &str {
        self.event
            .color
            .as_deref()
            .unwrap_or_else(|| self.event.category.color())
    }
}
