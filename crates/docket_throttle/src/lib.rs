//! Client-side request governor.
//!
//! Every outbound API call passes through a [`RequestThrottler`] before the network
//! layer issues it. The throttler layers three protections:
//!
//! - **Dedup cache**: a repeat of a recently allowed request is answered with the
//!   last recorded response instead of going back to the server.
//! - **Per-endpoint sliding window**: each `(method, url)` key may be checked at most
//!   `max_per_url` times per `window_ms`.
//! - **Global circuit breaker**: more than `global_max` checks across all keys within
//!   `window_ms` opens the breaker for `cooldown_ms`.
//!
//! Decisions are data, never errors. The caller issues the request on
//! [`Decision::Allow`], uses the payload on [`Decision::Cache`], and backs off on
//! [`Decision::Reject`].
//!
//! ```
//! use docket_throttle::{Decision, RequestThrottler, ThrottleConfig};
//!
//! # fn main() -> docket_error::DocketResult<()> {
//! let throttler = RequestThrottler::new(ThrottleConfig::default())?;
//!
//! assert!(throttler.check(Some("GET"), Some("/api/agencies")).is_allow());
//! throttler.record_response(Some("GET"), Some("/api/agencies"), vec!["Records Office"]);
//!
//! // Within min_interval_ms the recorded response is reused.
//! match throttler.check(Some("GET"), Some("/api/agencies")) {
//!     Decision::Cache(agencies) => assert_eq!(agencies, vec!["Records Office"]),
//!     other => panic!("expected cache, got {}", other.action()),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decision;
mod key;
mod stats;
mod throttler;
mod window;

pub use config::{ThrottleConfig, ThrottleConfigBuilder, ThrottleConfigBuilderError};
pub use decision::{Decision, Rejection};
pub use key::{DEFAULT_METHOD, RequestKey};
pub use stats::ThrottleStats;
pub use throttler::RequestThrottler;

/// Clock sources accepted by [`RequestThrottler::with_clock`].
pub mod clock {
    pub use governor::clock::{Clock, DefaultClock, FakeRelativeClock, Reference};
}
