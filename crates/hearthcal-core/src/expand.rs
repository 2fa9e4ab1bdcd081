//! Occurrence expansion.
//!
//! Turns stored events into the concrete occurrences that fall inside a
//! query window.
//!
//! One-off events produce at most one occurrence, kept when their span
//! touches the window ([`TimeWindow::overlaps_inclusive`]).
//!
//! Recurring events are walked instance by instance with [`SeriesWalk`],
//! starting at the event's own start. The walk continues only while all of
//! these hold:
//! - the instance starts before the window end
//! - the instance starts before the series ceiling
//! - fewer than `max_occurrences` instances have been walked
//! - fewer than the rule's `COUNT` instances have been walked, if it has one
//!
//! Instances are counted whether or not they are kept, so `COUNT` bounds the
//! series from its start, not the visible part. A walked instance is kept
//! when it overlaps the window per [`TimeWindow::overlaps_instance`].
//!
//! The series ceiling is the earlier of the event's `recurrence_end` and the
//! rule's `UNTIL`; with neither, it is the window end pushed out by the
//! configured horizon.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, trace};

use crate::config::ExpansionConfig;
use crate::event::{Occurrence, StoredEvent};
use crate::rule::RecurrenceRule;
use crate::time::TimeWindow;

/// Why a series walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The next instance starts at or after the window end.
    WindowEnd,
    /// The next instance starts at or after the series ceiling.
    Ceiling,
    /// The safety cap on walked instances was reached.
    SafetyCap,
    /// The rule's `COUNT` was reached.
    Count,
    /// The next instance is outside chrono's representable range.
    OutOfRange,
}

/// Bounded walk over the instances of a recurring series.
///
/// Yields `(start, end)` for every instance walked, in order. Filtering
/// against the window is left to the caller; the walk only decides when to
/// stop.
#[derive(Debug, Clone)]
pub struct SeriesWalk<'a> {
    rule: &'a RecurrenceRule,
    series_start: NaiveDateTime,
    duration: Duration,
    window_end: NaiveDateTime,
    ceiling: NaiveDateTime,
    max_occurrences: usize,
    walked: usize,
    current: Option<NaiveDateTime>,
    stopped: Option<StopReason>,
}

impl<'a> SeriesWalk<'a> {
    /// Creates a walk over `rule` for a series whose first instance spans
    /// `series_start .. series_start + duration`.
    pub fn new(
        rule: &'a RecurrenceRule,
        series_start: NaiveDateTime,
        duration: Duration,
        window: &TimeWindow,
        ceiling: NaiveDateTime,
        max_occurrences: usize,
    ) -> Self {
        Self {
            rule,
            series_start,
            duration,
            window_end: window.end,
            ceiling,
            max_occurrences,
            walked: 0,
            current: Some(series_start),
            stopped: None,
        }
    }

    /// Number of instances walked so far.
    pub fn walked(&self) -> usize {
        self.walked
    }

    /// Why the walk ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    /// The continuation guard. `None` means walk `start`.
    fn check(&self, start: NaiveDateTime) -> Option<StopReason> {
        if start >= self.window_end {
            Some(StopReason::WindowEnd)
        } else if start >= self.ceiling {
            Some(StopReason::Ceiling)
        } else if self.walked >= self.max_occurrences {
            Some(StopReason::SafetyCap)
        } else if self
            .rule
            .count
            .is_some_and(|count| self.walked >= count as usize)
        {
            Some(StopReason::Count)
        } else {
            None
        }
    }
}

impl Iterator for SeriesWalk<'_> {
    type Item = (NaiveDateTime, NaiveDateTime);

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped.is_some() {
            return None;
        }

        let Some(start) = self.current else {
            self.stopped = Some(StopReason::OutOfRange);
            return None;
        };
        if let Some(reason) = self.check(start) {
            self.stopped = Some(reason);
            return None;
        }

        let end = start
            .checked_add_signed(self.duration)
            .unwrap_or(NaiveDateTime::MAX);

        self.walked += 1;
        self.current = u32::try_from(self.walked)
            .ok()
            .and_then(|index| self.rule.nth_start(self.series_start, index));

        Some((start, end))
    }
}

/// Expands stored events with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    config: ExpansionConfig,
}

impl Expander {
    /// Creates an expander with the given limits.
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Expands one stored event against `window`.
    ///
    /// Never fails: an inverted window, or a degenerate event, yields no
    /// occurrences.
    pub fn expand_event(&self, event: &StoredEvent, window: &TimeWindow) -> Vec<Occurrence> {
        if window.is_inverted() {
            debug!(event_id = %event.id, "Inverted window, nothing to expand");
            return Vec::new();
        }

        if !event.is_recurring() {
            return if window.overlaps_inclusive(event.start_time, event.end_time) {
                vec![Occurrence::single(event)]
            } else {
                Vec::new()
            };
        }

        let Some(rule) = event.rule() else {
            debug!(event_id = %event.id, "Recurring event has no usable rule");
            return Vec::new();
        };

        self.expand_series(event, &rule, window)
    }

    /// Expands every event against `window`, sorted by occurrence start.
    ///
    /// Occurrences starting at the same instant keep input order. Events
    /// are not deduplicated: an event listed twice contributes twice.
    pub fn expand(&self, events: &[StoredEvent], window: &TimeWindow) -> Vec<Occurrence> {
        let mut occurrences: Vec<Occurrence> = events
            .iter()
            .flat_map(|event| self.expand_event(event, window))
            .collect();

        occurrences.sort_by_key(|o| o.occurrence_start);

        debug!(
            events = events.len(),
            occurrences = occurrences.len(),
            "Expanded events"
        );
        occurrences
    }

    /// The instant no instance of `event` may start at or after.
    pub fn ceiling(
        &self,
        event: &StoredEvent,
        rule: &RecurrenceRule,
        window: &TimeWindow,
    ) -> NaiveDateTime {
        match (event.recurrence_end, rule.until) {
            (Some(end), Some(until)) => end.min(until),
            (Some(end), None) => end,
            (None, Some(until)) => until,
            (None, None) => window.horizon(self.config.horizon_months),
        }
    }

    fn expand_series(
        &self,
        event: &StoredEvent,
        rule: &RecurrenceRule,
        window: &TimeWindow,
    ) -> Vec<Occurrence> {
        let ceiling = self.ceiling(event, rule, window);
        let mut walk = SeriesWalk::new(
            rule,
            event.start_time,
            event.duration(),
            window,
            ceiling,
            self.config.max_occurrences,
        );

        let mut occurrences = Vec::new();
        for (start, end) in walk.by_ref() {
            if window.overlaps_instance(start, end) {
                trace!(event_id = %event.id, start = %start, "Keeping instance");
                occurrences.push(Occurrence::instance(event, start, end));
            }
        }

        debug!(
            event_id = %event.id,
            walked = walk.walked(),
            kept = occurrences.len(),
            stop = ?walk.stop_reason(),
            "Expanded recurring event"
        );
        occurrences
    }
}

/// Expands a single stored event against `window`.
///
/// `max_occurrences` caps the number of instances walked for a recurring
/// event; [`DEFAULT_MAX_OCCURRENCES`](crate::config::DEFAULT_MAX_OCCURRENCES)
/// is the usual value.
pub fn expand_single_event(
    event: &StoredEvent,
    window: &TimeWindow,
    max_occurrences: usize,
) -> Vec<Occurrence> {
    Expander::new(ExpansionConfig::default().with_max_occurrences(max_occurrences))
        .expand_event(event, window)
}

/// Expands all `events` against `window` with default limits, sorted by
/// occurrence start.
pub fn expand_many_events(events: &[StoredEvent], window: &TimeWindow) -> Vec<Occurrence> {
    Expander::default().expand(events, window)
}
