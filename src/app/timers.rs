//! Owned, poll-driven timers for coalescing bursts of input.
//!
//! Both timers are plain values owned by the store. They never spawn threads or
//! register callbacks: the event loop hands them the current [`Instant`] and
//! they answer whether a value is due. This keeps them independent of any
//! render cycle and lets tests drive time explicitly.
//!
//! - [`Throttle`]: at most one emission per window, leading and trailing edge.
//!   Feeds the sort engine's observed map center.
//! - [`Debouncer`]: emits once the input has been quiet for the delay.
//!   Feeds place geocoding.

use std::time::{Duration, Instant};

/// Rate limiter with leading- and trailing-edge emission.
///
/// The first value after a quiet window passes through immediately (when
/// `leading` is set). Values arriving inside the window replace each other and
/// the last one is emitted by [`Throttle::poll`] once the window closes, so the
/// final input of a burst is never lost.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    leading: bool,
    window_start: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            leading: true,
            window_start: None,
            pending: None,
        }
    }

    /// Disables leading-edge emission; every value then waits for the window.
    #[must_use]
    pub fn trailing_only(mut self) -> Self {
        self.leading = false;
        self
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    fn window_open(&self, now: Instant) -> bool {
        self.window_start
            .is_some_and(|start| now.saturating_duration_since(start) < self.window)
    }

    /// Offers a value. Returns it straight back if it may be emitted now.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.pending = Some(value);
            return None;
        }

        self.window_start = Some(now);
        if self.leading {
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Emits the pending trailing value once the window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() || self.window_open(now) {
            return None;
        }
        self.window_start = Some(now);
        self.pending.take()
    }

    /// Emits the pending value regardless of the window.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let value = self.pending.take()?;
        self.window_start = Some(now);
        Some(value)
    }

    /// Drops any pending value and forgets the current window.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.window_start = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.window_start.map(|start| start + self.window)
    }
}

/// Trailing-edge debouncer: holds the latest value until the input has been
/// quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Sets a new delay value and returns self for method chaining.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the pending value and restarts the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Emits the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Emits the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn throttle_emits_leading_then_one_trailing_for_a_burst() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(500 * MS);
        let mut emitted = Vec::new();

        for i in 0..10u32 {
            let now = t0 + (i * 20) * MS;
            emitted.extend(throttle.push(i, now));
            emitted.extend(throttle.poll(now));
        }
        for step in 0..50u32 {
            emitted.extend(throttle.poll(t0 + (200 + step * 20) * MS));
        }

        assert_eq!(emitted, vec![0, 9]);
    }

    #[test]
    fn trailing_only_throttle_suppresses_the_leading_edge() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(500 * MS).trailing_only();

        assert_eq!(throttle.push("a", t0), None);
        assert_eq!(throttle.push("b", t0 + 100 * MS), None);
        assert_eq!(throttle.poll(t0 + 499 * MS), None);
        assert_eq!(throttle.poll(t0 + 500 * MS), Some("b"));
        assert_eq!(throttle.poll(t0 + 2000 * MS), None);
    }

    #[test]
    fn throttle_passes_values_separated_by_quiet_windows() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(500 * MS);
        assert_eq!(throttle.push(1, t0), Some(1));
        assert_eq!(throttle.push(2, t0 + 600 * MS), Some(2));
    }

    #[test]
    fn throttle_cancel_and_flush() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(500 * MS);
        throttle.push(1, t0);
        throttle.push(2, t0 + MS);
        assert_eq!(throttle.deadline(), Some(t0 + 500 * MS));
        assert_eq!(throttle.flush(t0 + 2 * MS), Some(2));

        throttle.push(3, t0 + 3 * MS);
        throttle.cancel();
        assert!(!throttle.is_pending());
        assert_eq!(throttle.poll(t0 + 10_000 * MS), None);
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(500 * MS);

        debouncer.push("ber", t0);
        debouncer.push("berl", t0 + 300 * MS);
        assert_eq!(debouncer.poll(t0 + 600 * MS), None);
        assert_eq!(debouncer.poll(t0 + 800 * MS), Some("berl"));
        assert_eq!(debouncer.poll(t0 + 900 * MS), None);
    }

    #[test]
    fn debouncer_cancel_drops_pending_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(500 * MS).with_delay(100 * MS);
        debouncer.push(1, t0);
        assert_eq!(debouncer.deadline(), Some(t0 + 100 * MS));
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + 200 * MS), None);
        assert_eq!(debouncer.flush(), None);
    }
}
