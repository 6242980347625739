//! Point-in-time throttler snapshot.

use crate::Decision;
use derive_getters::Getters;
use serde::Serialize;
use std::time::Duration;

/// Snapshot returned by [`RequestThrottler::stats`](crate::RequestThrottler::stats).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Getters)]
pub struct ThrottleStats {
    /// Distinct request keys currently held in memory.
    tracked_keys: usize,
    /// Checks across all keys inside the current window.
    global_in_window: usize,
    /// Whether the circuit breaker is open right now.
    breaker_open: bool,
    /// Cooldown left while the breaker is open.
    breaker_remaining: Option<Duration>,
    /// Cumulative `allow` decisions.
    allowed: u64,
    /// Cumulative `cache` decisions.
    cached: u64,
    /// Cumulative `reject` decisions.
    rejected: u64,
}

impl ThrottleStats {
    pub(crate) fn new(
        tracked_keys: usize,
        global_in_window: usize,
        breaker_remaining: Option<Duration>,
        counters: DecisionCounters,
    ) -> Self {
        Self {
            tracked_keys,
            global_in_window,
            breaker_open: breaker_remaining.is_some(),
            breaker_remaining,
            allowed: counters.allowed,
            cached: counters.cached,
            rejected: counters.rejected,
        }
    }

    /// Total decisions handed out.
    pub fn total(&self) -> u64 {
        self.allowed + self.cached + self.rejected
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DecisionCounters {
    pub allowed: u64,
    pub cached: u64,
    pub rejected: u64,
}

impl DecisionCounters {
    pub(crate) fn observe<T>(&mut self, decision: &Decision<T>) {
        match decision {
            Decision::Allow => self.allowed += 1,
            Decision::Cache(_) => self.cached += 1,
            Decision::Reject(_) => self.rejected += 1,
        }
    }
}
