//! Time types for occurrence expansion.
//!
//! This module provides [`TimeWindow`] for defining query ranges,
//! [`CalendarView`] for deriving the fetch window of a calendar page, and
//! lenient date-time parsing for values coming out of storage.
//!
//! All values are naive local calendar date-times. No timezone arithmetic
//! happens anywhere in the engine.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
    Weekday,
};
use serde::{Deserialize, Serialize};

/// Formats accepted for date-time strings without an offset.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
];

/// Formats accepted for bare dates (read as midnight).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parses a stored date-time string.
///
/// Accepts RFC 3339 (the wall-clock part is kept and the offset dropped),
/// ISO date-times without offset, the compact iCalendar form, and bare
/// dates which map to midnight. Returns `None` for anything else.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(start_of_day)
        })
}

/// Formats a date-time the way it is written back to storage.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date)
        .checked_add_signed(Duration::milliseconds(86_399_999))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Adds calendar months, clamping to the last day of shorter months.
///
/// Saturates at the ends of chrono's range.
fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Adds whole days. Saturates at the ends of chrono's range.
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let n = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(n).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(n).unwrap_or(NaiveDate::MIN)
    }
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    // the last month of the range has no successor
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// First day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday to Sunday.
    Monday,
}

impl WeekStart {
    /// Returns the first day of the week containing `date`.
    pub fn start_of_week(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            Self::Sunday => date.weekday().num_days_from_sunday(),
            Self::Monday => date.weekday().num_days_from_monday(),
        };
        shift_days(date, -i64::from(offset))
    }

    /// Returns the last day of the week containing `date`.
    pub fn end_of_week(self, date: NaiveDate) -> NaiveDate {
        shift_days(self.start_of_week(date), 6)
    }

    /// The weekday a week begins on.
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

/// The calendar page being displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    /// Moves the selected date one page forward or back.
    pub fn step(self, date: NaiveDate, forward: bool) -> NaiveDate {
        let sign = if forward { 1 } else { -1 };
        match self {
            Self::Month => shift_months(date, sign),
            Self::Week => shift_days(date, 7 * i64::from(sign)),
            Self::Day => shift_days(date, i64::from(sign)),
        }
    }
}

/// A time window for querying occurrences.
///
/// Both bounds are plain calendar date-times. The window is not validated:
/// an inverted window (`start > end`) is representable and simply matches
/// nothing during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window.
    pub start: NaiveDateTime,
    /// End of the window.
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Computes the window fetched for a calendar page.
    ///
    /// Every view is padded by a month on each side so that paging nearby
    /// does not leave gaps:
    /// - month: from the start of the week holding the first day of the
    ///   previous month, to the end of the week holding the last day of the
    ///   next month
    /// - week: from the start of the week one month back, to the end of the
    ///   week one month ahead
    /// - day: from the first day of the previous month, to the last day of
    ///   the next month
    pub fn for_view(view: CalendarView, selected: NaiveDate, week_start: WeekStart) -> Self {
        let prev = shift_months(selected, -1);
        let next = shift_months(selected, 1);

        let (first, last) = match view {
            CalendarView::Month => (
                week_start.start_of_week(start_of_month(prev)),
                week_start.end_of_week(end_of_month(next)),
            ),
            CalendarView::Week => (
                week_start.start_of_week(prev),
                week_start.end_of_week(next),
            ),
            CalendarView::Day => (start_of_month(prev), end_of_month(next)),
        };

        Self::new(start_of_day(first), end_of_day(last))
    }

    /// Returns `true` if the window starts after it ends.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Overlap test used for one-off events.
    ///
    /// Inclusive at both ends: a span touching either bound still overlaps.
    pub fn overlaps_inclusive(&self, span_start: NaiveDateTime, span_end: NaiveDateTime) -> bool {
        !(span_start > self.end || span_end < self.start)
    }

    /// Overlap test used for instances of a recurring series.
    ///
    /// The instance must start or end strictly after the window start, and
    /// start strictly before the window end. An instance ending exactly at
    /// the window start is excluded, unlike [`Self::overlaps_inclusive`].
    pub fn overlaps_instance(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        (start > self.start || end > self.start) && start < self.end
    }

    /// The default recurrence ceiling: `end` pushed out by `months`.
    ///
    /// Saturates at the end of chrono's range.
    pub fn horizon(&self, months: u32) -> NaiveDateTime {
        self.end
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Serde adapters for stored date-time strings.
///
/// Deserialization goes through [`parse_datetime`]; serialization writes
/// [`format_datetime`].
pub mod serde_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_datetime(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date-time '{}'", raw)))
    }

    /// Same as the parent module, for `Option<NaiveDateTime>` fields.
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_some(&super::super::format_datetime(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::super::parse_datetime(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date-time '{}'", raw))),
            }
        }
    }
}
