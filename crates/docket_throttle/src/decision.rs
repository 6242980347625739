//! Throttle decisions.

use std::time::Duration;

/// Why a request was refused.
///
/// Breaker reasons always name the circuit breaker and carry the cooldown in whole
/// seconds; the per-endpoint reason says the requests are too frequent.
///
/// ```
/// use docket_throttle::Rejection;
///
/// let open = Rejection::BreakerOpen { remaining_secs: 12 };
/// assert_eq!(open.reason(), "circuit breaker open: too many requests, retry in 12s");
///
/// let limited = Rejection::TooFrequent { key: "GET /api/documents".into(), retry_after_ms: 2_500 };
/// assert!(limited.reason().contains("too frequent"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Rejection {
    /// This call pushed global volume over the limit and opened the breaker.
    #[display("circuit breaker tripped: too many requests, retry in {}s", cooldown_secs)]
    BreakerTripped {
        /// Full cooldown, in whole seconds.
        cooldown_secs: u64,
    },

    /// The breaker was already open when this call arrived.
    #[display("circuit breaker open: too many requests, retry in {}s", remaining_secs)]
    BreakerOpen {
        /// Cooldown left, rounded up to whole seconds.
        remaining_secs: u64,
    },

    /// The endpoint exceeded its sliding-window limit and had nothing cached.
    #[display("requests to {} are too frequent, slow down", key)]
    TooFrequent {
        /// Display form of the request key.
        key: String,
        /// Time until the oldest call leaves the window.
        retry_after_ms: u64,
    },
}

impl Rejection {
    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Minimum back-off before the request could be allowed again.
    pub fn retry_after(&self) -> Duration {
        match self {
            Rejection::BreakerTripped { cooldown_secs } => Duration::from_secs(*cooldown_secs),
            Rejection::BreakerOpen { remaining_secs } => Duration::from_secs(*remaining_secs),
            Rejection::TooFrequent { retry_after_ms, .. } => Duration::from_millis(*retry_after_ms),
        }
    }

    /// True for both breaker variants.
    pub fn is_breaker(&self) -> bool {
        !matches!(self, Rejection::TooFrequent { .. })
    }
}

/// Outcome of [`RequestThrottler::check`](crate::RequestThrottler::check).
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    /// Proceed with the network request.
    Allow,
    /// Use this payload instead of issuing the request.
    Cache(T),
    /// Do not issue the request.
    Reject(Rejection),
}

impl<T> Decision<T> {
    /// Stable action name: `"allow"`, `"cache"` or `"reject"`.
    pub fn action(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Cache(_) => "cache",
            Decision::Reject(_) => "reject",
        }
    }

    /// True for [`Decision::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// True for [`Decision::Cache`].
    pub fn is_cache(&self) -> bool {
        matches!(self, Decision::Cache(_))
    }

    /// True for [`Decision::Reject`].
    pub fn is_reject(&self) -> bool {
        matches!(self, Decision::Reject(_))
    }

    /// The cached payload, if any.
    pub fn cached(&self) -> Option<&T> {
        match self {
            Decision::Cache(data) => Some(data),
            _ => None,
        }
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Reject(rejection) => Some(rejection),
            _ => None,
        }
    }
}
