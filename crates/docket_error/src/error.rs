//! The workspace-wide error type.

use crate::{ConfigError, HttpError, JsonError, ThrottleError};
use std::time::Duration;

/// Every failure a Docket crate can surface, one variant per concern.
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DocketErrorKind {
    /// Transport, status or body failure
    #[from(HttpError)]
    Http(HttpError),
    /// Payload that is not valid JSON
    #[from(JsonError)]
    Json(JsonError),
    /// Unreadable or invalid configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// Refused locally before reaching the network
    #[from(ThrottleError)]
    Throttle(ThrottleError),
}

/// Boxed [`DocketErrorKind`], so `DocketResult` stays one pointer wide on the happy path.
///
/// Any concern error converts with `?`:
///
/// ```
/// use docket_error::{DocketErrorKind, DocketResult, HttpError};
///
/// fn load_agency(id: u32) -> DocketResult<String> {
///     Err(HttpError::transport(format!("/api/agencies/{id}"), "connection refused"))?
/// }
///
/// let err = load_agency(7).unwrap_err();
/// assert!(matches!(err.kind(), DocketErrorKind::Http(_)));
/// assert!(err.is_retryable());
/// assert!(err.to_string().starts_with("Docket Error: HTTP Error (transport) for /api/agencies/7"));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Docket Error: {}", _0)]
pub struct DocketError(Box<DocketErrorKind>);

impl DocketError {
    /// Wrap a kind.
    pub fn new(kind: DocketErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// The underlying kind.
    pub fn kind(&self) -> &DocketErrorKind {
        &self.0
    }

    /// The throttle refusal, if the request never reached the network.
    pub fn as_throttle(&self) -> Option<&ThrottleError> {
        match self.kind() {
            DocketErrorKind::Throttle(e) => Some(e),
            _ => None,
        }
    }

    /// Whether repeating the same call later could succeed.
    ///
    /// Throttle refusals always can; HTTP failures defer to
    /// [`HttpError::is_retryable`]; bad payloads and bad configuration never can.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            DocketErrorKind::Throttle(_) => true,
            DocketErrorKind::Http(e) => e.is_retryable(),
            DocketErrorKind::Json(_) | DocketErrorKind::Config(_) => false,
        }
    }

    /// Back-off hint carried by a throttle refusal.
    pub fn retry_after(&self) -> Option<Duration> {
        self.as_throttle().and_then(ThrottleError::retry_after)
    }
}

impl<T> From<T> for DocketError
where
    T: Into<DocketErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result alias used across the workspace.
pub type DocketResult<T> = std::result::Result<T, DocketError>;
