//! Post-expansion selection and grouping.
//!
//! Everything here works on an already sorted occurrence list and keeps
//! that order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::Occurrence;

/// Which categories to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Every occurrence.
    #[default]
    All,
    /// Only occurrences whose event belongs to this household category.
    Only(String),
}

impl CategoryFilter {
    /// Builds a filter from an optional category id.
    pub fn from_option(category_id: Option<String>) -> Self {
        category_id.map_or(Self::All, Self::Only)
    }

    /// Returns true if `occurrence` passes the filter.
    pub fn matches(&self, occurrence: &Occurrence) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => occurrence.category_id() == Some(id.as_str()),
        }
    }

    /// Keeps the matching occurrences, in order.
    pub fn apply(&self, occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
        match self {
            Self::All => occurrences,
            Self::Only(_) => occurrences.into_iter().filter(|o| self.matches(o)).collect(),
        }
    }
}

/// Groups occurrences by the date they start on.
pub fn group_by_day(occurrences: &[Occurrence]) -> BTreeMap<NaiveDate, Vec<&Occurrence>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Occurrence>> = BTreeMap::new();
    for occurrence in occurrences {
        days.entry(occurrence.start_date()).or_default().push(occurrence);
    }
    days
}

/// Occurrences starting on `date`.
pub fn occurrences_on(occurrences: &[Occurrence], date: NaiveDate) -> Vec<&Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.start_date() == date)
        .collect()
}

/// Splits occurrences into `(all_day, timed)`.
pub fn split_all_day<'a>(
    occurrences: impl IntoIterator<Item = &'a Occurrence>,
) -> (Vec<&'a Occurrence>, Vec<&'a Occurrence>) {
    occurrences.into_iter().partition(|o| o.is_all_day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StoredEvent;
    use chrono::NaiveDateTime;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn occ(id: &str, start: NaiveDateTime, category: Option<&str>) -> Occurrence {
        let mut event = StoredEvent::new(id, id, start, start + chrono::Duration::hours(1));
        event.category_id = category.map(str::to_string);
        Occurrence::single(&event)
    }

    fn sample() -> Vec<Occurrence> {
        vec![
            occ("a", dt(2024, 3, 1, 9, 0), Some("work")),
            occ("b", dt(2024, 3, 1, 12, 0), None),
            occ("c", dt(2024, 3, 2, 9, 0), Some("family")),
            occ("d", dt(2024, 3, 4, 18, 0), Some("work")),
        ]
    }

    fn ids(occurrences: &[&Occurrence]) -> Vec<String> {
        occurrences.iter().map(|o| o.source_event_id.clone()).collect()
    }

    #[test]
    fn all_keeps_everything() {
        assert_eq!(CategoryFilter::All.apply(sample()).len(), 4);
        assert_eq!(CategoryFilter::from_option(None), CategoryFilter::All);
    }

    #[test]
    fn only_keeps_matching_in_order() {
        let filter = CategoryFilter::from_option(Some("work".to_string()));
        let kept = filter.apply(sample());
        let kept: Vec<&str> = kept.iter().map(|o| o.source_event_id.as_str()).collect();
        assert_eq!(kept, vec!["a", "d"]);
    }

    #[test]
    fn only_unknown_category_is_empty() {
        let filter = CategoryFilter::Only("nope".to_string());
        assert!(filter.apply(sample()).is_empty());
    }

    #[test]
    fn grouping_by_day() {
        let occurrences = sample();
        let days = group_by_day(&occurrences);
        assert_eq!(
            days.keys().copied().collect::<Vec<_>>(),
            vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 4)]
        );
        assert_eq!(ids(&days[&date(2024, 3, 1)]), vec!["a", "b"]);
    }

    #[test]
    fn on_a_date() {
        let occurrences = sample();
        assert_eq!(ids(&occurrences_on(&occurrences, date(2024, 3, 2))), vec!["c"]);
        assert!(occurrences_on(&occurrences, date(2024, 3, 3)).is_empty());
    }

    #[test]
    fn all_day_split() {
        let mut occurrences = sample();
        occurrences[1].event.is_all_day = true;
        let (all_day, timed) = split_all_day(&occurrences);
        assert_eq!(ids(&all_day), vec!["b"]);
        assert_eq!(ids(&timed), vec!["a", "c", "d"]);
    }
}
