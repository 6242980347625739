//! Errors for requests refused by the client-side throttler.

use std::time::Duration;

/// Why the throttler refused a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ThrottleErrorKind {
    /// Too many requests for one endpoint inside the sliding window.
    #[display("Rate limited: {}", _0)]
    RateLimited(String),

    /// The global circuit breaker is open.
    #[display("Circuit open: {}", _0)]
    CircuitOpen(String),
}

/// Throttle refusal with a back-off hint and location tracking.
///
/// # Examples
///
/// ```
/// use docket_error::{ThrottleError, ThrottleErrorKind};
/// use std::time::Duration;
///
/// let err = ThrottleError::new(
///     ThrottleErrorKind::CircuitOpen("circuit breaker open, retry in 12s".into()),
///     Some(Duration::from_secs(12)),
/// );
/// assert!(err.is_circuit_open());
/// assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Throttle Error: {} at line {} in {}", kind, line, file)]
pub struct ThrottleError {
    kind: ThrottleErrorKind,
    retry_after: Option<Duration>,
    line: u32,
    file: &'static str,
}

impl ThrottleError {
    /// Create a new throttle error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ThrottleErrorKind, retry_after: Option<Duration>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            retry_after,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ThrottleErrorKind {
        &self.kind
    }

    /// Minimum time the caller should wait before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// True when the refusal came from the global circuit breaker.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self.kind, ThrottleErrorKind::CircuitOpen(_))
    }
}
