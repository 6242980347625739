//! Configuration errors.

use std::fmt;
use std::path::{Path, PathBuf};

/// Invalid tunables, or a configuration source that could not be read or parsed.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Configuration file involved, if the error came from one
    pub path: Option<PathBuf>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError at the current location.
    ///
    /// ```
    /// use docket_error::ConfigError;
    ///
    /// let err = ConfigError::new("window_ms must be greater than 0");
    /// assert!(err.path.is_none());
    /// assert!(err.to_string().starts_with("Configuration Error: window_ms"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError naming the file that caused it.
    ///
    /// ```
    /// use docket_error::ConfigError;
    ///
    /// let err = ConfigError::for_path("/etc/docket.toml", "invalid type for max_per_url");
    /// assert!(err.to_string().contains("(/etc/docket.toml)"));
    /// ```
    #[track_caller]
    pub fn for_path(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::new(message)
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration Error: {}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
