//! Output rendering for occurrence lists.
//!
//! Text output is one line per occurrence; JSON output uses the flat
//! [`JsonOccurrence`] shape rather than the full stored record.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hearthcal_core::{Occurrence, TimeWindow, format_datetime, split_all_day};

use crate::error::{CliError, CliResult};

/// JSON output for `expand`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Occurrences, sorted by start.
    pub occurrences: Vec<JsonOccurrence>,
    /// Number of occurrences returned.
    pub count: usize,
}

/// JSON output for `view`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonViewOutput {
    /// Start of the fetched window.
    pub window_start: String,
    /// End of the fetched window.
    pub window_end: String,
    /// Days that have at least one occurrence.
    pub days: Vec<JsonDay>,
    /// Number of occurrences across all days.
    pub count: usize,
}

/// One day of a `view`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDay {
    pub date: String,
    pub occurrences: Vec<JsonOccurrence>,
}

/// A single occurrence in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOccurrence {
    /// Unique key for this instance.
    pub key: String,
    /// Id of the stored event.
    pub event_id: String,
    pub title: String,
    /// Start time in ISO 8601 format.
    pub start: String,
    /// End time in ISO 8601 format.
    pub end: String,
    pub is_all_day: bool,
    pub is_recurring: bool,
    /// Human-readable recurrence summary.
    pub recurrence: String,
    /// Colour to display the occurrence with.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Reminder labels, e.g. "15 minutes before".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reminders: Vec<String>,
}

impl From<&Occurrence> for JsonOccurrence {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            key: occurrence.instance_key(),
            event_id: occurrence.source_event_id.clone(),
            title: occurrence.title().to_string(),
            start: format_datetime(&occurrence.occurrence_start),
            end: format_datetime(&occurrence.occurrence_end),
            is_all_day: occurrence.is_all_day(),
            is_recurring: occurrence.is_recurring,
            recurrence: occurrence.event.describe_recurrence(),
            color: occurrence.display_color().to_string(),
            category_id: occurrence.category_id().map(str::to_string),
            reminders: occurrence.event.reminder_labels(),
        }
    }
}

/// Builds the `expand` JSON output.
pub fn json_output(occurrences: &[Occurrence]) -> JsonOutput {
    JsonOutput {
        occurrences: occurrences.iter().map(JsonOccurrence::from).collect(),
        count: occurrences.len(),
    }
}

/// Builds the `view` JSON output.
pub fn json_view_output(
    window: &TimeWindow,
    days: &BTreeMap<NaiveDate, Vec<&Occurrence>>,
) -> JsonViewOutput {
    let days: Vec<JsonDay> = days
        .iter()
        .map(|(date, occurrences)| JsonDay {
            date: date.format("%Y-%m-%d").to_string(),
            occurrences: occurrences.iter().map(|o| JsonOccurrence::from(*o)).collect(),
        })
        .collect();

    JsonViewOutput {
        window_start: format_datetime(&window.start),
        window_end: format_datetime(&window.end),
        count: days.iter().map(|d| d.occurrences.len()).sum(),
        days,
    }
}

/// Serializes any output value as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(CliError::Json)
}

/// The time column: `09:00-10:00`, `all day`, or an end on another date.
fn time_span(occurrence: &Occurrence) -> String {
    if occurrence.is_all_day() {
        return "all day".to_string();
    }

    let start = occurrence.occurrence_start;
    let end = occurrence.occurrence_end;
    if start.date() == end.date() {
        format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{}-{}", start.format("%H:%M"), end.format("%b %d %H:%M"))
    }
}

fn occurrence_line(occurrence: &Occurrence) -> String {
    let mut line = format!("{:<11}  {}", time_span(occurrence), occurrence.title());
    if occurrence.is_recurring {
        line.push_str(&format!(" ({})", occurrence.event.describe_recurrence()));
    }
    line
}

/// Renders a flat occurrence list, one line each.
pub fn render_list(occurrences: &[Occurrence], no_events_text: &str) -> String {
    if occurrences.is_empty() {
        return no_events_text.to_string();
    }

    occurrences
        .iter()
        .map(|o| {
            format!(
                "{}  {}",
                o.occurrence_start.format("%a %Y-%m-%d"),
                occurrence_line(o)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders occurrences grouped by day, all-day entries first within a day.
pub fn render_days(days: &BTreeMap<NaiveDate, Vec<&Occurrence>>, no_events_text: &str) -> String {
    if days.is_empty() {
        return no_events_text.to_string();
    }

    let mut blocks = Vec::with_capacity(days.len());
    for (date, occurrences) in days {
        let (all_day, timed) = split_all_day(occurrences.iter().copied());
        let mut block = vec![date.format("%A %Y-%m-%d").to_string()];
        block.extend(
            all_day
                .into_iter()
                .chain(timed)
                .map(|o| format!("  {}", occurrence_line(o))),
        );
        blocks.push(block.join("\n"));
    }
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use hearthcal_core::{EventCategory, StoredEvent, expand_many_events, group_by_day};

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn sample_events() -> Vec<StoredEvent> {
        vec![
            StoredEvent::new("swim", "Swimming", dt(2024, 3, 4, 17, 0), dt(2024, 3, 4, 18, 0))
                .with_rule("FREQ=WEEKLY")
                .with_category(EventCategory::Family),
            StoredEvent::new("dentist", "Dentist", dt(2024, 3, 5, 9, 0), dt(2024, 3, 5, 10, 0))
                .with_color("#FF0000"),
            StoredEvent::new("trip", "Trip", dt(2024, 3, 5, 0, 0), dt(2024, 3, 6, 0, 0))
                .with_all_day(true),
            StoredEvent::new("night", "Night shift", dt(2024, 3, 6, 22, 0), dt(2024, 3, 7, 6, 0)),
        ]
    }

    fn sample_window() -> TimeWindow {
        TimeWindow::new(dt(2024, 3, 4, 0, 0), dt(2024, 3, 12, 0, 0))
    }

    #[test]
    fn list_empty() {
        insta::assert_snapshot!(render_list(&[], "No events"), @"No events");
    }

    #[test]
    fn list_text() {
        let occurrences = expand_many_events(&sample_events(), &sample_window());
        insta::assert_snapshot!(render_list(&occurrences, "No events"), @r"
        Mon 2024-03-04  17:00-18:00  Swimming (Weekly)
        Tue 2024-03-05  all day      Trip
        Tue 2024-03-05  09:00-10:00  Dentist
        Wed 2024-03-06  22:00-Mar 07 06:00  Night shift
        Mon 2024-03-11  17:00-18:00  Swimming (Weekly)
        ");
    }

    #[test]
    fn days_text() {
        let occurrences = expand_many_events(&sample_events(), &sample_window());
        let days = group_by_day(&occurrences);
        insta::assert_snapshot!(render_days(&days, "No events"), @r"
        Monday 2024-03-04
          17:00-18:00  Swimming (Weekly)

        Tuesday 2024-03-05
          all day      Trip
          09:00-10:00  Dentist

        Wednesday 2024-03-06
          22:00-Mar 07 06:00  Night shift

        Monday 2024-03-11
          17:00-18:00  Swimming (Weekly)
        ");
    }

    #[test]
    fn json_single() {
        let events = vec![
            StoredEvent::new("dentist", "Dentist", dt(2024, 3, 5, 9, 0), dt(2024, 3, 5, 10, 0))
                .with_category_id("health"),
        ];
        let occurrences = expand_many_events(&events, &sample_window());
        insta::assert_json_snapshot!(json_output(&occurrences), @r###"
        {
          "occurrences": [
            {
              "key": "dentist-2024-03-05T09:00:00",
              "event_id": "dentist",
              "title": "Dentist",
              "start": "2024-03-05T09:00:00",
              "end": "2024-03-05T10:00:00",
              "is_all_day": false,
              "is_recurring": false,
              "recurrence": "Does not repeat",
              "color": "#6B7280",
              "category_id": "health"
            }
          ],
          "count": 1
        }
        "###);
    }

    #[test]
    fn json_lists_reminders() {
        let event = StoredEvent::new("swim", "Swimming", dt(2024, 3, 4, 17, 0), dt(2024, 3, 4, 18, 0))
            .with_reminders(vec![30, 1440]);
        let occurrence = JsonOccurrence::from(&Occurrence::single(&event));
        assert_eq!(occurrence.reminders, vec!["30 minutes before", "1 day before"]);

        let value = serde_json::to_value(&occurrence).unwrap();
        assert_eq!(value["reminders"][1], "1 day before");
    }

    #[test]
    fn json_view_counts_across_days() {
        let occurrences = expand_many_events(&sample_events(), &sample_window());
        let days = group_by_day(&occurrences);
        let output = json_view_output(&sample_window(), &days);

        assert_eq!(output.window_start, "2024-03-04T00:00:00");
        assert_eq!(output.window_end, "2024-03-12T00:00:00");
        assert_eq!(output.count, 5);
        let dates: Vec<&str> = output.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-03-04", "2024-03-05", "2024-03-06", "2024-03-11"]
        );
        assert_eq!(output.days[0].occurrences[0].color, EventCategory::Family.color());
        assert_eq!(output.days[1].occurrences[1].color, "#FF0000");
    }
}
