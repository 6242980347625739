//! Error types for the Docket workspace.
//!
//! This crate provides the foundation error types used by every Docket crate.
//!
//! # Error Hierarchy
//!
//! - [`DocketError`] boxes a [`DocketErrorKind`], one variant per concern
//! - each concern has its own struct capturing the call site with `#[track_caller]`
//! - any concern error converts into [`DocketError`] with `?`
//!
//! Throttling decisions are not errors. Only the HTTP composition root turns a
//! rejected request into a [`ThrottleError`] for its callers.
//!
//! ```
//! use docket_error::{ConfigError, DocketResult};
//!
//! fn check_timeout(secs: u64) -> DocketResult<u64> {
//!     if secs == 0 {
//!         Err(ConfigError::new("timeout_secs must be greater than 0"))?
//!     }
//!     Ok(secs)
//! }
//!
//! assert!(check_timeout(0).is_err());
//! assert_eq!(check_timeout(30).unwrap(), 30);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod json;
mod throttle;

pub use config::ConfigError;
pub use error::{DocketError, DocketErrorKind, DocketResult};
pub use http::{HttpError, HttpErrorKind};
pub use json::{JsonError, SNIPPET_LEN};
pub use throttle::{ThrottleError, ThrottleErrorKind};
