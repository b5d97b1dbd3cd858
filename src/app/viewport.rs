//! View synchronizer: controlled vs observed map regions, list snap state.
//!
//! The controlled region is what the engine asks the map to animate to. The
//! observed region is what the map reports after it settles, throttled, and
//! is only ever used as the sort reference. Keeping them apart means neither
//! a programmatic move nor a user drag can make the other one snap.

use crate::app::modes::ListSnap;
use crate::app::timers::Throttle;
use crate::domain::{Coordinates, Region};
use std::time::{Duration, Instant};

/// Scroll index at which the list offers a scroll-to-top affordance.
pub const SCROLL_TO_TOP_THRESHOLD: usize = 2;

/// A press on the map, as reported by the clusterer.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerPress {
    /// A single event marker.
    Point { event_id: String },
    /// A cluster glyph with the region that splits it apart.
    Cluster { expansion: Region },
}

#[derive(Debug, Clone)]
pub struct ViewportSync {
    controlled: Region,
    observed: Option<Region>,
    user_location: Option<Coordinates>,
    has_fix: bool,
    manual_pan: bool,
    centered_on_user: bool,
    detail_span: f64,
    throttle: Throttle<Region>,
    list_snap: ListSnap,
    scroll_index: usize,
}

impl ViewportSync {
    #[must_use]
    pub fn new(default_region: Region, detail_span: f64, throttle_window: Duration) -> Self {
        Self {
            controlled: default_region,
            observed: None,
            user_location: None,
            has_fix: false,
            manual_pan: false,
            centered_on_user: false,
            detail_span,
            throttle: Throttle::new(throttle_window),
            list_snap: ListSnap::Minimized,
            scroll_index: 0,
        }
    }

    #[must_use]
    pub const fn controlled(&self) -> Region {
        self.controlled
    }

    #[must_use]
    pub const fn observed(&self) -> Option<Region> {
        self.observed
    }

    /// Center used by the map-center sort: the last observed region, or the
    /// controlled one until the map has reported anything.
    #[must_use]
    pub fn map_center(&self) -> Coordinates {
        self.observed.unwrap_or(self.controlled).center()
    }

    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    #[must_use]
    pub const fn centered_on_user(&self) -> bool {
        self.centered_on_user
    }

    #[must_use]
    pub const fn list_snap(&self) -> ListSnap {
        self.list_snap
    }

    #[must_use]
    pub const fn scroll_index(&self) -> usize {
        self.scroll_index
    }

    /// Records a device location fix.
    ///
    /// The first fix always recenters. Later fixes recenter only while the
    /// user has not panned since the last recenter. Returns the new
    /// controlled region when the map should move.
    pub fn location_fixed(&mut self, location: Coordinates) -> Option<Region> {
        self.user_location = Some(location);
        let first = !self.has_fix;
        self.has_fix = true;

        if first || !self.manual_pan {
            self.controlled = Region::around(location, self.detail_span);
            self.centered_on_user = true;
            self.manual_pan = false;
            tracing::debug!(first, "recentering on location fix");
            Some(self.controlled)
        } else {
            tracing::debug!("location fix ignored after manual pan");
            None
        }
    }

    /// Location permission was denied or the fix failed. The default center
    /// stays in place.
    pub fn location_unavailable(&mut self) {
        self.centered_on_user = false;
    }

    /// The center-on-user button: re-arms recentering and moves to the last
    /// known location if there is one.
    pub fn center_on_user(&mut self) -> Option<Region> {
        self.manual_pan = false;
        let location = self.user_location?;
        self.controlled = Region::around(location, self.detail_span);
        self.centered_on_user = true;
        Some(self.controlled)
    }

    /// The user dragged the map.
    pub fn map_panned(&mut self) {
        self.centered_on_user = false;
        self.manual_pan = true;
    }

    /// The map settled on `region`. Returns `true` if the observed region
    /// changed right away; otherwise it is held until the throttle window
    /// closes and released by [`ViewportSync::poll`].
    pub fn region_settled(&mut self, region: Region, now: Instant) -> bool {
        match self.throttle.push(region, now) {
            Some(region) => {
                self.observed = Some(region);
                true
            }
            None => false,
        }
    }

    /// Releases a throttled region. Returns `true` if the observed region
    /// changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.throttle.poll(now) {
            Some(region) => {
                self.observed = Some(region);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Sets the controlled region to a detail view around `point`.
    pub fn focus(&mut self, point: Coordinates) -> Region {
        self.controlled = Region::around(point, self.detail_span);
        self.centered_on_user = false;
        self.controlled
    }

    /// Animates to an arbitrary region, e.g. a cluster expansion.
    pub fn animate_to(&mut self, region: Region) -> Region {
        self.controlled = region;
        self.controlled
    }

    /// Focuses a list item's event and collapses the list.
    pub fn select_list_item(&mut self, point: Coordinates) -> Region {
        self.list_snap = ListSnap::Minimized;
        self.focus(point)
    }

    /// Returns `true` if the snap position changed.
    pub fn set_list_snap(&mut self, snap: ListSnap) -> bool {
        std::mem::replace(&mut self.list_snap, snap) != snap
    }

    pub fn list_scrolled(&mut self, index: usize) {
        self.scroll_index = index;
    }

    #[must_use]
    pub const fn show_scroll_to_top(&self) -> bool {
        self.scroll_index >= SCROLL_TO_TOP_THRESHOLD
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn sync() -> ViewportSync {
        ViewportSync::new(
            Region::around(Coordinates::new(10.4515, 51.1657), 30.0),
            0.1,
            500 * MS,
        )
    }

    #[test]
    fn first_fix_recenters_and_later_fixes_respect_manual_pan() {
        let mut viewport = sync();
        let home = Coordinates::new(13.4, 52.5);

        let region = viewport.location_fixed(home).unwrap();
        assert_eq!(region.center(), home);
        assert!(viewport.centered_on_user());

        viewport.map_panned();
        assert!(!viewport.centered_on_user());
        assert_eq!(viewport.location_fixed(Coordinates::new(13.5, 52.6)), None);
        assert_eq!(viewport.controlled().center(), home);

        let back = viewport.center_on_user().unwrap();
        assert_eq!(back.center(), Coordinates::new(13.5, 52.6));
        assert!(viewport.location_fixed(Coordinates::new(13.6, 52.7)).is_some());
    }

    #[test]
    fn first_fix_recenters_even_after_a_pan() {
        let mut viewport = sync();
        viewport.map_panned();
        assert!(viewport.location_fixed(Coordinates::new(1.0, 2.0)).is_some());

        // No pan since the first fix recentered.
        let second = viewport.location_fixed(Coordinates::new(2.0, 2.0));
        assert_eq!(second.map(|r| r.center()), Some(Coordinates::new(2.0, 2.0)));
        assert_eq!(viewport.controlled().center(), Coordinates::new(2.0, 2.0));
    }

    #[test]
    fn settled_regions_are_throttled_but_the_last_one_lands() {
        let t0 = Instant::now();
        let mut viewport = sync();
        let mut changes = 0;

        for i in 0..10u32 {
            let region = Region::around(Coordinates::new(f64::from(i), 0.0), 1.0);
            let now = t0 + (i * 20) * MS;
            changes += usize::from(viewport.region_settled(region, now));
            changes += usize::from(viewport.poll(now));
        }
        assert_eq!(changes, 1);
        assert_eq!(viewport.map_center(), Coordinates::new(0.0, 0.0));

        assert!(viewport.poll(t0 + 600 * MS));
        assert_eq!(viewport.map_center(), Coordinates::new(9.0, 0.0));
    }

    #[test]
    fn observed_region_never_moves_the_controlled_one() {
        let t0 = Instant::now();
        let mut viewport = sync();
        let before = viewport.controlled();
        viewport.map_panned();
        viewport.region_settled(Region::around(Coordinates::new(5.0, 5.0), 1.0), t0);
        assert_eq!(viewport.controlled(), before);
    }

    #[test]
    fn selecting_a_list_item_collapses_and_focuses() {
        let mut viewport = sync();
        viewport.set_list_snap(ListSnap::Expanded);
        let region = viewport.select_list_item(Coordinates::new(2.0, 3.0));
        assert_eq!(region, Region::around(Coordinates::new(2.0, 3.0), 0.1));
        assert_eq!(viewport.list_snap(), ListSnap::Minimized);
    }

    #[test]
    fn scroll_to_top_affordance_from_index_two() {
        let mut viewport = sync();
        viewport.list_scrolled(1);
        assert!(!viewport.show_scroll_to_top());
        viewport.list_scrolled(2);
        assert!(viewport.show_scroll_to_top());
        viewport.scroll_to_top();
        assert_eq!(viewport.scroll_index(), 0);
    }
}
