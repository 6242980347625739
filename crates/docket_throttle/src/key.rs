//! Request identity.

use serde::{Deserialize, Serialize};

/// Method assumed when a caller does not supply one.
pub const DEFAULT_METHOD: &str = "GET";

/// Logical identity of a request: `(HTTP method, normalized URL)`.
///
/// Missing parts are defaulted rather than rejected, so a malformed call still
/// yields a usable key.
///
/// ```
/// use docket_throttle::RequestKey;
///
/// let key = RequestKey::new(None, Some(" /api/vendors "));
/// assert_eq!(key.method(), "GET");
/// assert_eq!(key.url(), "/api/vendors");
/// assert_eq!(key.to_string(), "GET /api/vendors");
///
/// let degenerate = RequestKey::new(Some("post"), None);
/// assert_eq!(degenerate.to_string(), "POST ");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{} {}", method, url)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    /// Derive a key, defaulting the method to `GET` and the URL to an empty string.
    pub fn new(method: Option<&str>, url: Option<&str>) -> Self {
        let method = method
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_METHOD)
            .to_ascii_uppercase();
        let url = url.map(str::trim).unwrap_or_default().to_string();

        Self { method, url }
    }

    /// Upper-cased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Normalized URL, empty for the degenerate key.
    pub fn url(&self) -> &str {
        &self.url
    }
}
