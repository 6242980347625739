//! JSON errors.

use std::fmt;

/// Longest body excerpt kept on a [`JsonError`].
pub const SNIPPET_LEN: usize = 120;

/// A payload that could not be encoded or decoded.
#[derive(Debug, Clone, derive_more::Error)]
pub struct JsonError {
    /// Parser message
    pub message: String,
    /// Start of the offending body, cut at [`SNIPPET_LEN`] characters
    pub snippet: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a JsonError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            snippet: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attach the start of the body that failed to parse.
    ///
    /// ```
    /// use docket_error::JsonError;
    ///
    /// let body = "<html>".repeat(100);
    /// let err = JsonError::new("expected value at line 1 column 1").with_snippet(&body);
    /// assert_eq!(err.snippet.as_deref().map(|s| s.chars().count()), Some(120));
    /// assert!(err.to_string().contains("near \"<html>"));
    /// ```
    pub fn with_snippet(mut self, body: &str) -> Self {
        self.snippet = Some(body.chars().take(SNIPPET_LEN).collect());
        self
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON Error: {}", self.message)?;
        if let Some(snippet) = &self.snippet {
            write!(f, " near {:?}", snippet)?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
