//! Throttled JSON client.

use crate::{ClientConfig, DocketConfig};
use docket_error::{ConfigError, DocketResult, HttpError, JsonError, ThrottleError, ThrottleErrorKind};
use docket_throttle::{Decision, Rejection, RequestThrottler};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// HTTP client that gates every outbound call through a shared [`RequestThrottler`].
///
/// Clones share the same connection pool and the same throttler.
///
/// # Example
///
/// ```no_run
/// use docket_client::{DocketConfig, ThrottledClient};
///
/// # async fn run() -> docket_error::DocketResult<()> {
/// let client = ThrottledClient::new(DocketConfig::load()?)?;
///
/// // Served from the network the first time, from the dedup cache on a quick repeat.
/// let agencies = client.get_json("/api/agencies").await?;
/// let again = client.get_json("/api/agencies").await?;
/// assert_eq!(agencies, again);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ThrottledClient {
    config: ClientConfig,
    http: reqwest::Client,
    throttler: Arc<RequestThrottler<Value>>,
}

impl ThrottledClient {
    /// Build a client and its throttler from configuration.
    ///
    /// When the throttle configuration carries a cleanup schedule and a tokio runtime
    /// is running, the idle-key sweep is started as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the throttle configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: DocketConfig) -> DocketResult<Self> {
        let schedule = config.throttle.cleanup_schedule();
        let throttler = Arc::new(RequestThrottler::new(config.throttle)?);

        if let Some((every, max_idle)) = schedule {
            if tokio::runtime::Handle::try_current().is_ok() {
                throttler.spawn_cleanup_loop(every, max_idle);
            } else {
                warn!("No tokio runtime available, idle-key cleanup not started");
            }
        }

        Self::with_throttler(config.client, throttler)
    }

    /// Build a client around an existing throttler.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip_all, fields(base_url = ?config.base_url()))]
    pub fn with_throttler(
        config: ClientConfig,
        throttler: Arc<RequestThrottler<Value>>,
    ) -> DocketResult<Self> {
        debug!("Creating throttled client");

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent().as_str())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            throttler,
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared throttler.
    pub fn throttler(&self) -> &Arc<RequestThrottler<Value>> {
        &self.throttler
    }

    /// Final URL for `path`: absolute URLs pass through, relative paths are joined
    /// onto `base_url` when one is configured.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match self.config.base_url() {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Send a JSON request, subject to the throttler.
    ///
    /// A cached decision returns the stored body without touching the network; a
    /// rejection becomes a [`ThrottleError`]. An empty response body yields
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`ThrottleError`] when the throttler refuses the request
    /// - [`HttpError`] on transport failures or non-success status codes
    /// - [`JsonError`] when the response body is not valid JSON
    #[instrument(skip(self, body), fields(url))]
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> DocketResult<Value> {
        let url = self.resolve_url(path);
        tracing::Span::current().record("url", url.as_str());

        match self.throttler.check(Some(method.as_str()), Some(&url)) {
            Decision::Allow => {}
            Decision::Cache(data) => {
                debug!("Serving response from throttle cache");
                return Ok(data);
            }
            Decision::Reject(rejection) => {
                warn!(reason = %rejection, "Request refused by throttler");
                return Err(throttle_error(&rejection).into());
            }
        }

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            HttpError::transport(url.as_str(), e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Server returned error");
            return Err(HttpError::status(
                url.as_str(),
                status.as_u16(),
                format!("{} returned {}", method, status),
            )
            .into());
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body: {}", e);
            HttpError::body(url.as_str(), format!("Failed to read response: {}", e))
        })?;

        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                error!("Failed to parse response: {}", e);
                JsonError::new(format!("Failed to parse response from {}: {}", url, e))
                    .with_snippet(&text)
            })?
        };

        self.throttler
            .record_response(Some(method.as_str()), Some(&url), data.clone());
        debug!("Request completed");
        Ok(data)
    }

    /// `GET` a JSON resource.
    pub async fn get_json(&self, path: &str) -> DocketResult<Value> {
        self.request_json(Method::GET, path, None).await
    }

    /// `POST` a JSON body.
    pub async fn post_json(&self, path: &str, body: &Value) -> DocketResult<Value> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// `PUT` a JSON body.
    pub async fn put_json(&self, path: &str, body: &Value) -> DocketResult<Value> {
        self.request_json(Method::PUT, path, Some(body)).await
    }

    /// `DELETE` a resource.
    pub async fn delete_json(&self, path: &str) -> DocketResult<Value> {
        self.request_json(Method::DELETE, path, None).await
    }
}

#[track_caller]
fn throttle_error(rejection: &Rejection) -> ThrottleError {
    let kind = if rejection.is_breaker() {
        ThrottleErrorKind::CircuitOpen(rejection.reason())
    } else {
        ThrottleErrorKind::RateLimited(rejection.reason())
    };
    ThrottleError::new(kind, Some(rejection.retry_after()))
}
