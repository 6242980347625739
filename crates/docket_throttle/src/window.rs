//! Lazily pruned sliding windows of call timestamps.

use governor::clock::Reference;
use std::collections::VecDeque;
use std::time::Duration;

/// Time elapsed between two readings of the same clock.
pub(crate) fn elapsed<I: Reference>(now: I, earlier: I) -> Duration {
    Duration::from(now.duration_since(earlier))
}

/// Ordered queue of call times.
///
/// Entries are appended at the back and dropped from the front once their age
/// reaches the window length. Pruning only happens when the window is consulted.
#[derive(Debug)]
pub(crate) struct SlidingWindow<I> {
    stamps: VecDeque<I>,
}

impl<I: Reference> SlidingWindow<I> {
    pub(crate) fn new() -> Self {
        Self {
            stamps: VecDeque::new(),
        }
    }

    /// Append `now`, prune, and return the number of calls still inside the window.
    pub(crate) fn record(&mut self, now: I, window: Duration) -> usize {
        self.stamps.push_back(now);
        self.prune(now, window);
        self.stamps.len()
    }

    fn prune(&mut self, now: I, window: Duration) {
        while let Some(oldest) = self.stamps.front()
            && elapsed(now, *oldest) >= window
        {
            self.stamps.pop_front();
        }
    }

    /// Calls inside the window at `now`, without mutating the queue.
    pub(crate) fn count_within(&self, now: I, window: Duration) -> usize {
        self.stamps
            .iter()
            .filter(|stamp| elapsed(now, **stamp) < window)
            .count()
    }

    /// Time until the oldest retained call leaves the window.
    pub(crate) fn retry_after(&self, now: I, window: Duration) -> Duration {
        match self.stamps.front() {
            None => Duration::ZERO,
            Some(oldest) => window.saturating_sub(elapsed(now, *oldest)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::clock::{Clock, FakeRelativeClock};

    #[test]
    fn record_prunes_expired_entries_from_the_front() {
        let clock = FakeRelativeClock::default();
        let window = Duration::from_millis(100);
        let mut w = SlidingWindow::new();

        assert_eq!(w.record(clock.now(), window), 1);
        clock.advance(Duration::from_millis(60));
        assert_eq!(w.record(clock.now(), window), 2);
        clock.advance(Duration::from_millis(40));
        // First entry is exactly one window old.
        assert_eq!(w.record(clock.now(), window), 2);
        assert_eq!(w.stamps.len(), 2);
    }

    #[test]
    fn count_within_does_not_mutate() {
        let clock = FakeRelativeClock::default();
        let window = Duration::from_millis(100);
        let mut w = SlidingWindow::new();

        w.record(clock.now(), window);
        w.record(clock.now(), window);
        clock.advance(Duration::from_millis(150));

        assert_eq!(w.count_within(clock.now(), window), 0);
        assert_eq!(w.stamps.len(), 2);
    }

    #[test]
    fn retry_after_tracks_oldest_entry() {
        let clock = FakeRelativeClock::default();
        let window = Duration::from_millis(1_000);
        let mut w = SlidingWindow::new();

        assert_eq!(w.retry_after(clock.now(), window), Duration::ZERO);
        w.record(clock.now(), window);
        clock.advance(Duration::from_millis(300));
        w.record(clock.now(), window);

        assert_eq!(
            w.retry_after(clock.now(), window),
            Duration::from_millis(700)
        );
    }
}
