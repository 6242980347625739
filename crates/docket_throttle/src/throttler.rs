//! The request governor state machine.

use crate::stats::DecisionCounters;
use crate::window::{SlidingWindow, elapsed};
use crate::{Decision, Rejection, RequestKey, ThrottleConfig, ThrottleStats};
use docket_error::DocketResult;
use governor::clock::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Per-key state, created lazily on first use.
#[derive(Debug)]
struct RequestRecord<T, I> {
    /// Last allowed call, the reference point for the dedup interval.
    last_timestamp: Option<I>,
    /// Last payload passed to `record_response`. Last write wins.
    last_data: Option<T>,
    /// Checks on this key, used for the per-key limit.
    window: SlidingWindow<I>,
    /// Last check or record on this key, used only for idle eviction.
    last_touched: I,
}

impl<T, I: governor::clock::Reference> RequestRecord<T, I> {
    fn new(now: I) -> Self {
        Self {
            last_timestamp: None,
            last_data: None,
            window: SlidingWindow::new(),
            last_touched: now,
        }
    }
}

#[derive(Debug)]
struct ThrottleState<T, I> {
    records: HashMap<RequestKey, RequestRecord<T, I>>,
    global: SlidingWindow<I>,
    breaker_tripped_at: Option<I>,
    counters: DecisionCounters,
}

impl<T: Clone, I: governor::clock::Reference> ThrottleState<T, I> {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            global: SlidingWindow::new(),
            breaker_tripped_at: None,
            counters: DecisionCounters::default(),
        }
    }

    fn breaker_remaining(&self, now: I, cooldown: Duration) -> Option<Duration> {
        let tripped_at = self.breaker_tripped_at?;
        let open_for = elapsed(now, tripped_at);
        (open_for < cooldown).then(|| cooldown - open_for)
    }

    fn decide(&mut self, config: &ThrottleConfig, key: RequestKey, now: I) -> Decision<T> {
        // Breaker first: while open nothing else is recorded.
        if self.breaker_tripped_at.is_some() {
            if let Some(remaining) = self.breaker_remaining(now, config.cooldown()) {
                return Decision::Reject(Rejection::BreakerOpen {
                    remaining_secs: whole_secs(remaining),
                });
            }
            info!("Breaker cooldown elapsed, closing circuit");
            self.breaker_tripped_at = None;
        }

        let global_count = self.global.record(now, config.window());
        if global_count > *config.global_max() {
            warn!(
                global_count,
                global_max = config.global_max(),
                cooldown_ms = config.cooldown_ms(),
                "Global request volume exceeded, tripping circuit breaker"
            );
            self.breaker_tripped_at = Some(now);
            return Decision::Reject(Rejection::BreakerTripped {
                cooldown_secs: whole_secs(config.cooldown()),
            });
        }

        let record = self
            .records
            .entry(key.clone())
            .or_insert_with(|| RequestRecord::new(now));
        record.last_touched = now;

        if let Some(data) = &record.last_data
            && let Some(last) = record.last_timestamp
            && elapsed(now, last) < config.min_interval()
        {
            debug!(%key, "Duplicate within min interval, serving cached response");
            return Decision::Cache(data.clone());
        }

        let key_count = record.window.record(now, config.window());
        if key_count > *config.max_per_url() {
            return match &record.last_data {
                Some(data) => {
                    debug!(%key, key_count, "Per-key limit exceeded, serving cached response");
                    Decision::Cache(data.clone())
                }
                None => {
                    debug!(%key, key_count, "Per-key limit exceeded with nothing cached");
                    let retry_after = record.window.retry_after(now, config.window());
                    Decision::Reject(Rejection::TooFrequent {
                        key: key.to_string(),
                        retry_after_ms: u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            };
        }

        record.last_timestamp = Some(now);
        Decision::Allow
    }
}

const MIN_CLEANUP_INTERVAL: Duration = Duration::from_millis(1);

/// Cooldowns are reported in whole seconds, rounded up so a caller never retries early.
fn whole_secs(d: Duration) -> u64 {
    u64::try_from(d.as_millis().div_ceil(1_000)).unwrap_or(u64::MAX)
}

/// Client-side request governor.
///
/// Owns the dedup cache, the per-key sliding windows and the global circuit breaker
/// for one HTTP client. Build one instance per client or session and share it
/// behind an [`Arc`]; every method takes `&self`.
///
/// # Algorithm
///
/// Each [`check`](Self::check) runs these steps in order:
///
/// 1. **Breaker:** while open, reject with the remaining cooldown; once the cooldown
///    has elapsed, close it and continue.
/// 2. **Global window:** record the call; above `global_max`, trip the breaker and
///    reject.
/// 3. **Dedup:** if the key has recorded data and was last allowed less than
///    `min_interval_ms` ago, return the data.
/// 4. **Per-key window:** record the call; above `max_per_url`, return the cached
///    data if there is any, otherwise reject.
/// 5. Otherwise mark the key as allowed now and allow.
///
/// Window insertions happen even when the call is eventually rejected, so overload
/// is counted regardless of what the caller does next.
///
/// # Thread Safety
///
/// All state lives behind a single [`Mutex`]. A `check` or `record_response` is one
/// critical section, so the prune-compare-append sequences never interleave.
///
/// # Memory
///
/// Per-key records are kept until [`evict_idle`](Self::evict_idle) removes them,
/// either directly or from the loop started by
/// [`spawn_cleanup_loop`](Self::spawn_cleanup_loop).
///
/// # Examples
///
/// ```
/// use docket_throttle::{Decision, RequestThrottler, ThrottleConfig};
/// use docket_throttle::clock::FakeRelativeClock;
/// use std::time::Duration;
///
/// # fn main() -> docket_error::DocketResult<()> {
/// let clock = FakeRelativeClock::default();
/// let throttler = RequestThrottler::with_clock(ThrottleConfig::default(), clock.clone())?;
///
/// assert!(throttler.check(Some("GET"), Some("/a")).is_allow());
/// throttler.record_response(Some("GET"), Some("/a"), 1);
///
/// clock.advance(Duration::from_millis(500));
/// assert_eq!(throttler.check(Some("GET"), Some("/a")), Decision::Cache(1));
///
/// clock.advance(Duration::from_millis(600));
/// assert!(throttler.check(Some("GET"), Some("/a")).is_allow());
/// # Ok(())
/// # }
/// ```
pub struct RequestThrottler<T, C: Clock = DefaultClock> {
    config: ThrottleConfig,
    clock: C,
    state: Mutex<ThrottleState<T, C::Instant>>,
}

impl<T: Clone> RequestThrottler<T> {
    /// Create a throttler on the default monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails [`ThrottleConfig::validate`].
    pub fn new(config: ThrottleConfig) -> DocketResult<Self> {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<T: Clone, C: Clock> RequestThrottler<T, C> {
    /// Create a throttler reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails [`ThrottleConfig::validate`].
    #[instrument(skip_all, fields(
        min_interval_ms = config.min_interval_ms(),
        max_per_url = config.max_per_url(),
        window_ms = config.window_ms(),
        global_max = config.global_max(),
        cooldown_ms = config.cooldown_ms(),
    ))]
    pub fn with_clock(config: ThrottleConfig, clock: C) -> DocketResult<Self> {
        config.validate()?;
        debug!("Creating request throttler");
        Ok(Self {
            config,
            clock,
            state: Mutex::new(ThrottleState::new()),
        })
    }

    /// The configuration this throttler was built with.
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, ThrottleState<T, C::Instant>> {
        // Every mutation completes before the guard drops, so a poisoned lock still
        // holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether a request may go to the network.
    ///
    /// `method` defaults to `GET` and `url` to an empty string. Never fails.
    #[instrument(level = "trace", skip(self))]
    pub fn check(&self, method: Option<&str>, url: Option<&str>) -> Decision<T> {
        let key = RequestKey::new(method, url);
        let now = self.clock.now();

        let mut state = self.lock();
        let decision = state.decide(&self.config, key, now);
        state.counters.observe(&decision);

        if let Decision::Reject(rejection) = &decision {
            debug!(reason = %rejection, "Request rejected");
        }
        decision
    }

    /// Store `data` as the latest response for the key.
    ///
    /// Creates the record when the key has never been checked, stamping it as
    /// allowed now so an immediate `check` is served from cache. Never touches the
    /// windows. Last write wins.
    #[instrument(level = "trace", skip(self, data))]
    pub fn record_response(&self, method: Option<&str>, url: Option<&str>, data: T) {
        let key = RequestKey::new(method, url);
        let now = self.clock.now();

        let mut state = self.lock();
        let record = state.records.entry(key).or_insert_with(|| {
            let mut record = RequestRecord::new(now);
            record.last_timestamp = Some(now);
            record
        });
        record.last_data = Some(data);
        record.last_touched = now;
    }

    /// Snapshot of current state and cumulative decision counts.
    pub fn stats(&self) -> ThrottleStats {
        let now = self.clock.now();
        let state = self.lock();

        ThrottleStats::new(
            state.records.len(),
            state.global.count_within(now, self.config.window()),
            state.breaker_remaining(now, self.config.cooldown()),
            state.counters,
        )
    }

    /// Drop per-key records untouched for `max_idle`.
    ///
    /// The threshold is raised to at least `window_ms` and `min_interval_ms`, so no
    /// window entry or dedup stamp that could still count is discarded. The recorded
    /// response is dropped with the record: an evicted key behaves exactly like one
    /// that was never seen, and its next checks go to the network rather than the
    /// cache. Returns the number of records removed.
    #[instrument(skip(self))]
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let threshold = max_idle
            .max(self.config.window())
            .max(self.config.min_interval());
        let now = self.clock.now();

        let mut state = self.lock();
        let before = state.records.len();
        state
            .records
            .retain(|_, record| elapsed(now, record.last_touched) < threshold);

        let removed = before - state.records.len();
        if removed > 0 {
            info!(
                removed,
                remaining = state.records.len(),
                "Evicted idle request records"
            );
        }
        removed
    }

    /// Periodically call [`evict_idle`](Self::evict_idle) on a tokio task.
    ///
    /// The task holds a weak reference and stops once the throttler is dropped.
    /// `every` is raised to at least one millisecond. Must be called from within a
    /// tokio runtime.
    pub fn spawn_cleanup_loop(self: &Arc<Self>, every: Duration, max_idle: Duration) -> JoinHandle<()>
    where
        T: Send + 'static,
        C: Send + Sync + 'static,
    {
        debug!(?every, ?max_idle, "Starting idle-key cleanup loop");
        let throttler = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every.max(MIN_CLEANUP_INTERVAL));
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(throttler) = throttler.upgrade() else {
                    debug!("Throttler dropped, stopping cleanup loop");
                    break;
                };
                throttler.evict_idle(max_idle);
            }
        })
    }
}

impl<T, C: Clock> std::fmt::Debug for RequestThrottler<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
