//! Sort engine: display order over the filtered events.
//!
//! Distances are recomputed from scratch on every run against the reference
//! point the store hands in; nothing here caches. Ordering is stable, so ties
//! keep filter (and therefore source) order.

use crate::app::modes::SortCriterion;
use crate::domain::{haversine_km, Coordinates, MapEvent};
use std::cmp::Ordering;
use std::sync::Arc;

/// One row of the display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedEvent {
    pub event: Arc<MapEvent>,
    /// Distance to the reference point, when the criterion is distance based
    /// and a reference point is known.
    pub distance_km: Option<f64>,
}

/// Orders `filtered` by `criterion`.
///
/// For the two distance criteria `reference` is the observed map center or
/// the user's location. Without a reference point the filtered order is kept
/// and no distances are reported.
///
/// ```
/// use eventmap::app::modes::SortCriterion;
/// use eventmap::app::sort::sort_events;
/// use eventmap::domain::{Coordinates, EventCollection};
///
/// let collection = EventCollection::new(vec![]).unwrap();
/// let sorted = sort_events(collection.events(), SortCriterion::Date, None);
/// assert!(sorted.is_empty());
/// # let _ = Coordinates::new(0.0, 0.0);
/// ```
#[must_use]
pub fn sort_events(
    filtered: &[Arc<MapEvent>],
    criterion: SortCriterion,
    reference: Option<Coordinates>,
) -> Vec<SortedEvent> {
    let _span = tracing::debug_span!("sort_events",
        criterion = ?criterion,
        count = filtered.len(),
        has_reference = reference.is_some()
    )
    .entered();

    match criterion {
        SortCriterion::MapCenter | SortCriterion::UserLocation => {
            let Some(reference) = reference else {
                tracing::debug!("no reference point, keeping filter order");
                return unsorted(filtered);
            };
            let mut rows: Vec<SortedEvent> = filtered
                .iter()
                .map(|event| SortedEvent {
                    distance_km: Some(haversine_km(event.coordinates, reference)),
                    event: Arc::clone(event),
                })
                .collect();
            rows.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
            rows
        }
        SortCriterion::Date => {
            let mut keyed: Vec<_> = filtered
                .iter()
                .map(|event| (event.parsed_date(), event))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
            keyed
                .into_iter()
                .map(|(_, event)| SortedEvent {
                    event: Arc::clone(event),
                    distance_km: None,
                })
                .collect()
        }
    }
}

fn unsorted(filtered: &[Arc<MapEvent>]) -> Vec<SortedEvent> {
    filtered
        .iter()
        .map(|event| SortedEvent {
            event: Arc::clone(event),
            distance_km: None,
        })
        .collect()
}

// NaN distances (from NaN coordinates) sort last like invalid dates.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a.filter(|d| !d.is_nan()), b.filter(|d| !d.is_nan())) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::event;
    use crate::domain::EventCollection;

    fn ids(rows: &[SortedEvent]) -> Vec<&str> {
        rows.iter().map(|r| r.event.id.as_str()).collect()
    }

    #[test]
    fn map_center_orders_by_distance_keeping_ties_stable() {
        let collection = EventCollection::new(vec![
            event("ne", "North east", "art", "2024-01-01", 10.0, 10.0),
            event("origin", "Origin", "art", "2024-01-01", 0.0, 0.0),
            event("sw", "South west", "art", "2024-01-01", -10.0, -10.0),
        ])
        .unwrap();

        let sorted = sort_events(
            collection.events(),
            SortCriterion::MapCenter,
            Some(Coordinates::new(0.0, 0.0)),
        );
        assert_eq!(ids(&sorted), vec!["origin", "ne", "sw"]);
        assert_eq!(sorted[0].distance_km, Some(0.0));
    }

    #[test]
    fn closer_events_always_precede_farther_ones() {
        let collection = EventCollection::new(vec![
            event("far", "Far", "art", "2024-01-01", 30.0, 40.0),
            event("near", "Near", "art", "2024-01-01", 13.5, 52.4),
            event("mid", "Mid", "art", "2024-01-01", 2.35, 48.85),
        ])
        .unwrap();
        let berlin = Coordinates::new(13.405, 52.52);

        let sorted = sort_events(collection.events(), SortCriterion::UserLocation, Some(berlin));
        for pair in sorted.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
        assert_eq!(ids(&sorted), vec!["near", "mid", "far"]);
    }

    #[test]
    fn date_sort_is_stable_and_puts_invalid_dates_last() {
        let collection = EventCollection::new(vec![
            event("bad", "Bad", "art", "someday", 0.0, 0.0),
            event("late", "Late", "art", "2024-12-01", 0.0, 0.0),
            event("same-a", "A", "art", "2024-06-01", 0.0, 0.0),
            event("same-b", "B", "art", "2024-06-01T00:00:00Z", 0.0, 0.0),
            event("early", "Early", "art", "2024-01-01", 0.0, 0.0),
        ])
        .unwrap();

        let sorted = sort_events(collection.events(), SortCriterion::Date, None);
        assert_eq!(ids(&sorted), vec!["early", "same-a", "same-b", "late", "bad"]);
    }

    #[test]
    fn missing_reference_keeps_filter_order() {
        let collection = EventCollection::new(vec![
            event("b", "B", "art", "2024-01-01", 5.0, 5.0),
            event("a", "A", "art", "2024-01-01", 0.0, 0.0),
        ])
        .unwrap();
        let sorted = sort_events(collection.events(), SortCriterion::UserLocation, None);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
        assert!(sorted.iter().all(|r| r.distance_km.is_none()));
    }
}
