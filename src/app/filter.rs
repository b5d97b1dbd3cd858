//! Filter pipeline: three independent predicates over the event collection.
//!
//! [`apply_filters`] runs the type, search and date predicates in that fixed
//! order and returns a new collection that shares the event allocations with
//! its input. The input is never touched.

use crate::domain::MapEvent;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Closed instant interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateInterval {
    /// Builds an interval, swapping the bounds if they arrive reversed.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Interval covering every instant of the days `first..=last`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use eventmap::app::filter::DateInterval;
    /// use eventmap::domain::event::parse_event_date;
    ///
    /// let day = |d: &str| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
    /// let interval = DateInterval::from_days(day("2024-05-01"), day("2024-12-01"));
    /// assert!(interval.contains(parse_event_date("2024-12-01T22:00:00Z").unwrap()));
    /// assert!(!interval.contains(parse_event_date("2024-12-02").unwrap()));
    /// ```
    #[must_use]
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: last.and_time(end_of_day).and_utc(),
        }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both bounds.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Committed filter state.
///
/// Mutated only by panel accept actions and the event search box; see
/// [`crate::app::panel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected event types. Empty means "no restriction".
    pub picked_types: BTreeSet<String>,
    /// Case-insensitive substring matched against event names.
    pub search_query: String,
    /// Inclusive date window, `None` for no restriction.
    pub date_interval: Option<DateInterval>,
}

impl FilterState {
    /// Whether the filter lets every event through.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.picked_types.is_empty() && self.search_query.is_empty() && self.date_interval.is_none()
    }
}

/// Type predicate. An empty selection passes everything.
#[must_use]
pub fn matches_type(event: &MapEvent, picked_types: &BTreeSet<String>) -> bool {
    picked_types.is_empty() || picked_types.contains(&event.event_type)
}

/// Search predicate. `needle` must already be lowercase; empty matches all.
#[must_use]
pub fn matches_search(event: &MapEvent, needle: &str) -> bool {
    needle.is_empty() || event.name.to_lowercase().contains(needle)
}

/// Date predicate. Unparseable dates never fall inside an interval.
#[must_use]
pub fn matches_date(event: &MapEvent, interval: Option<&DateInterval>) -> bool {
    interval.map_or(true, |interval| {
        event.parsed_date().is_some_and(|date| interval.contains(date))
    })
}

/// Applies type, search and date predicates in that order.
///
/// # Example
///
/// ```
/// use eventmap::app::filter::{apply_filters, FilterState};
/// use eventmap::domain::EventCollection;
///
/// let collection = EventCollection::new(vec![]).unwrap();
/// let filtered = apply_filters(collection.events(), &FilterState::default());
/// assert!(filtered.is_empty());
/// ```
#[must_use]
pub fn apply_filters(events: &[Arc<MapEvent>], filter: &FilterState) -> Vec<Arc<MapEvent>> {
    let _span = tracing::debug_span!("apply_filters",
        total_events = events.len(),
        picked_types = filter.picked_types.len(),
        query_len = filter.search_query.len(),
        has_interval = filter.date_interval.is_some()
    )
    .entered();

    let needle = filter.search_query.to_lowercase();

    let by_type: Vec<&Arc<MapEvent>> = events
        .iter()
        .filter(|e| matches_type(e, &filter.picked_types))
        .collect();
    let by_search: Vec<&Arc<MapEvent>> = by_type
        .into_iter()
        .filter(|e| matches_search(e, &needle))
        .collect();
    let filtered: Vec<Arc<MapEvent>> = by_search
        .into_iter()
        .filter(|e| matches_date(e, filter.date_interval.as_ref()))
        .cloned()
        .collect();

    tracing::debug!(filtered_count = filtered.len(), "filters applied");
    filtered
}

/// Type list shown in the Type panel: the universe narrowed by the search
/// text, case-insensitively.
#[must_use]
pub fn filter_type_list(universe: &[String], query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    universe
        .iter()
        .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The type indicator lights up only when the selection actually restricts
/// something: neither empty nor the full universe.
#[must_use]
pub fn is_type_filter_active(picked: &BTreeSet<String>, universe: &[String]) -> bool {
    !picked.is_empty() && !universe.iter().all(|t| picked.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::event;
    use crate::domain::EventCollection;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> EventCollection {
        EventCollection::new(vec![
            event("1", "Jazz Night", "music", "2024-01-01", 0.0, 0.0),
            event("2", "City Marathon", "sport", "2024-06-01", 1.0, 1.0),
            event("3", "Rock am Ring", "music", "2024-12-01", 2.0, 2.0),
            event("4", "Broken date", "art", "not a date", 3.0, 3.0),
        ])
        .unwrap()
    }

    fn ids(events: &[Arc<MapEvent>]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_passes_everything_in_order() {
        let collection = sample();
        let filtered = apply_filters(collection.events(), &FilterState::default());
        assert_eq!(ids(&filtered), vec!["1", "2", "3", "4"]);
        assert!(Arc::ptr_eq(&filtered[0], &collection.events()[0]));
    }

    #[test]
    fn type_filter_keeps_only_picked_types() {
        let collection = sample();
        let filter = FilterState {
            picked_types: BTreeSet::from(["music".to_string()]),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(collection.events(), &filter)), vec!["1", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let collection = sample();
        let filter = FilterState {
            search_query: "RING".to_string(),
            ..FilterState::default()
        };
        let filtered = apply_filters(collection.events(), &filter);
        assert_eq!(ids(&filtered), vec!["3"]);

        for e in collection.events() {
            let kept = filtered.iter().any(|f| f.id == e.id);
            assert_eq!(kept, e.name.to_lowercase().contains("ring"));
        }
    }

    #[test]
    fn date_interval_is_inclusive_on_both_ends() {
        let collection = sample();
        let filter = FilterState {
            date_interval: Some(DateInterval::from_days(day("2024-05-01"), day("2024-12-01"))),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(collection.events(), &filter)), vec!["2", "3"]);

        let exact = FilterState {
            date_interval: Some(DateInterval::new(
                collection.events()[0].parsed_date().unwrap(),
                collection.events()[1].parsed_date().unwrap(),
            )),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(collection.events(), &exact)), vec!["1", "2"]);
    }

    #[test]
    fn predicates_compose_with_and() {
        let collection = sample();
        let filter = FilterState {
            picked_types: BTreeSet::from(["music".to_string(), "sport".to_string()]),
            search_query: "n".to_string(),
            date_interval: Some(DateInterval::from_days(day("2024-02-01"), day("2024-12-31"))),
        };
        assert_eq!(ids(&apply_filters(collection.events(), &filter)), vec!["2", "3"]);
    }

    #[test]
    fn reversed_interval_bounds_are_swapped() {
        let interval = DateInterval::from_days(day("2024-12-01"), day("2024-05-01"));
        assert!(interval.start() < interval.end());
    }

    #[test]
    fn type_list_filters_by_query() {
        let universe = vec!["music".to_string(), "sport".to_string(), "Musical".to_string()];
        assert_eq!(filter_type_list(&universe, "MUS"), vec!["music", "Musical"]);
        assert_eq!(filter_type_list(&universe, "").len(), 3);
    }

    #[test]
    fn type_indicator_requires_a_real_restriction() {
        let universe = vec!["music".to_string(), "sport".to_string()];
        assert!(!is_type_filter_active(&BTreeSet::new(), &universe));
        assert!(is_type_filter_active(&BTreeSet::from(["music".to_string()]), &universe));
        let all: BTreeSet<String> = universe.iter().cloned().collect();
        assert!(!is_type_filter_active(&all, &universe));
    }
}
