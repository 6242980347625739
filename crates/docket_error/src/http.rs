//! Failures talking to the records backend.

/// Where the exchange broke down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// No response: connection refused, timeout, TLS failure.
    #[display("transport")]
    Transport,
    /// The server answered with a non-success status.
    #[display("status {}", _0)]
    Status(u16),
    /// The response arrived but its body could not be read.
    #[display("body")]
    Body,
}

/// HTTP failure for one request, tagged with the URL and the call site.
///
/// ```
/// use docket_error::{HttpError, HttpErrorKind};
///
/// let err = HttpError::status("https://records.example.org/api/vendors", 503, "Service Unavailable");
/// assert_eq!(err.kind, HttpErrorKind::Status(503));
/// assert_eq!(err.status_code(), Some(503));
/// assert!(err.is_retryable());
///
/// let err = HttpError::status("https://records.example.org/api/vendors/9", 404, "Not Found");
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error ({}) for {}: {} at line {} in {}", kind, url, message, line, file)]
pub struct HttpError {
    /// Failure category
    pub kind: HttpErrorKind,
    /// Request URL
    pub url: String,
    /// Detail from the transport or the server
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    #[track_caller]
    fn at(kind: HttpErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            kind,
            url: url.into(),
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }

    /// The request never got a response.
    #[track_caller]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(HttpErrorKind::Transport, url, message)
    }

    /// The server answered with `code`.
    #[track_caller]
    pub fn status(url: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self::at(HttpErrorKind::Status(code), url, message)
    }

    /// The response body could not be read.
    #[track_caller]
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(HttpErrorKind::Body, url, message)
    }

    /// Response status, when the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            HttpErrorKind::Status(code) => Some(code),
            _ => None,
        }
    }

    /// Transport failures, `429` and `5xx` may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            HttpErrorKind::Transport => true,
            HttpErrorKind::Status(code) => code == 429 || code >= 500,
            HttpErrorKind::Body => false,
        }
    }
}
