//! Fetch command handler.

use super::load_config;
use docket::{ConfigError, DocketResult, JsonError, ThrottledClient};
use reqwest::Method;
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

/// Issue `repeat` requests to `url` and print how each one was served.
///
/// Throttle refusals are printed and do not stop the run; transport and
/// decoding failures do.
#[instrument(skip(body, file))]
pub async fn fetch(
    url: &str,
    method: &str,
    repeat: u32,
    body: Option<&str>,
    file: Option<&Path>,
) -> DocketResult<()> {
    let method = Method::from_bytes(method.trim().to_uppercase().as_bytes())
        .map_err(|e| ConfigError::new(format!("Invalid HTTP method {:?}: {}", method, e)))?;
    let body: Option<Value> = body
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| JsonError::new(format!("Invalid request body: {}", e)))?;

    let client = ThrottledClient::new(load_config(file)?)?;

    for attempt in 1..=repeat {
        let cached_before = *client.throttler().stats().cached();

        match client.request_json(method.clone(), url, body.as_ref()).await {
            Ok(data) => {
                let source = if *client.throttler().stats().cached() > cached_before {
                    "cache"
                } else {
                    "network"
                };
                println!("[{attempt}] {source}: {data}");
            }
            Err(e) => match e.as_throttle() {
                Some(refused) => println!(
                    "[{attempt}] refused: {} (retry in {}ms)",
                    refused.kind(),
                    e.retry_after().unwrap_or_default().as_millis()
                ),
                None => return Err(e),
            },
        }
    }

    let stats = client.throttler().stats();
    info!(
        allowed = stats.allowed(),
        cached = stats.cached(),
        rejected = stats.rejected(),
        breaker_open = stats.breaker_open(),
        "Fetch complete"
    );
    Ok(())
}
