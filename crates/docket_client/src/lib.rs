//! Throttled HTTP access to the Docket records backend.
//!
//! [`ThrottledClient`] is the composition root for outbound calls: it owns one
//! `reqwest::Client` and one shared [`RequestThrottler`](docket_throttle::RequestThrottler),
//! and routes every request through `check` before the network and
//! `record_response` after it.
//!
//! Configuration is layered with the `config` crate; see [`DocketConfig::load`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;

pub use client::ThrottledClient;
pub use config::{ClientConfig, ClientConfigBuilder, ClientConfigBuilderError, DocketConfig};
