//! Docket - records-management client toolkit
//!
//! Docket talks to the records backend (official documents, agency/vendor/project
//! registries, dispatch orders) through a single throttled HTTP client.
//!
//! # Architecture
//!
//! Docket is organized as a workspace with focused crates:
//!
//! - `docket_error` - Error types
//! - `docket_throttle` - Client-side request governor (dedup cache, per-endpoint
//!   sliding windows, global circuit breaker)
//! - `docket_client` - Throttled JSON client and layered configuration
//!
//! This crate (`docket`) re-exports everything for convenience.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docket::{DocketConfig, ThrottledClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     docket::init_tracing(false)?;
//!
//!     let client = ThrottledClient::new(DocketConfig::load()?)?;
//!     let documents = client.get_json("/api/documents").await?;
//!     println!("{documents}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod telemetry;

pub use docket_client::*;
pub use docket_error::*;
pub use docket_throttle::*;
pub use telemetry::init_tracing;
