//! Throttle tunables.
//!
//! Values are fixed when a [`RequestThrottler`](crate::RequestThrottler) is built. They
//! can be supplied programmatically through [`ThrottleConfigBuilder`] or read from the
//! `[throttle]` table of a TOML file:
//!
//! ```toml
//! [throttle]
//! min_interval_ms = 1000
//! max_per_url = 5
//! window_ms = 10000
//! global_max = 50
//! cooldown_ms = 30000
//! idle_key_ttl_ms = 600000
//! cleanup_interval_ms = 60000
//! ```

use config::{Config, File};
use derive_getters::Getters;
use docket_error::{ConfigError, DocketError, DocketResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Configuration for [`RequestThrottler`](crate::RequestThrottler).
///
/// # Example
///
/// ```
/// use docket_throttle::{ThrottleConfig, ThrottleConfigBuilder};
///
/// let config = ThrottleConfigBuilder::default()
///     .max_per_url(3)
///     .global_max(20)
///     .build()
///     .unwrap();
///
/// assert_eq!(*config.max_per_url(), 3);
/// assert_eq!(*config.window_ms(), 10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct ThrottleConfig {
    /// Minimum gap between allowed calls on one key before a repeat is served from cache.
    #[serde(default = "default_min_interval_ms")]
    min_interval_ms: u64,

    /// Maximum checks per key within `window_ms`.
    #[serde(default = "default_max_per_url")]
    max_per_url: usize,

    /// Sliding window used for per-key limits and the global breaker counter.
    #[serde(default = "default_window_ms")]
    window_ms: u64,

    /// Maximum checks across all keys within `window_ms` before the breaker trips.
    #[serde(default = "default_global_max")]
    global_max: usize,

    /// Minimum time the breaker stays open once tripped.
    #[serde(default = "default_cooldown_ms")]
    cooldown_ms: u64,

    /// Evict per-key records untouched for this long.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option))]
    idle_key_ttl_ms: Option<u64>,

    /// How often the background sweep runs when `idle_key_ttl_ms` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option))]
    cleanup_interval_ms: Option<u64>,
}

fn default_min_interval_ms() -> u64 {
    1_000
}

fn default_max_per_url() -> usize {
    5
}

fn default_window_ms() -> u64 {
    10_000
}

fn default_global_max() -> usize {
    50
}

fn default_cooldown_ms() -> u64 {
    30_000
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            max_per_url: default_max_per_url(),
            window_ms: default_window_ms(),
            global_max: default_global_max(),
            cooldown_ms: default_cooldown_ms(),
            idle_key_ttl_ms: None,
            cleanup_interval_ms: None,
        }
    }
}

#[derive(Deserialize)]
struct ThrottleSection {
    #[serde(default)]
    throttle: ThrottleConfig,
}

impl ThrottleConfig {
    /// Dedup interval as a [`Duration`].
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Sliding window as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Breaker cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Background sweep schedule, present only when both eviction settings are set.
    ///
    /// Returns `(interval, max_idle)`.
    pub fn cleanup_schedule(&self) -> Option<(Duration, Duration)> {
        match (self.cleanup_interval_ms, self.idle_key_ttl_ms) {
            (Some(interval), Some(idle)) => {
                Some((Duration::from_millis(interval), Duration::from_millis(idle)))
            }
            _ => None,
        }
    }

    /// Check the tunables are usable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a limit or duration is zero, or when
    /// `global_max` does not exceed `max_per_url`.
    pub fn validate(&self) -> DocketResult<()> {
        if self.max_per_url == 0 {
            return Err(ConfigError::new("max_per_url must be greater than 0").into());
        }
        if self.window_ms == 0 {
            return Err(ConfigError::new("window_ms must be greater than 0").into());
        }
        if self.cooldown_ms == 0 {
            return Err(ConfigError::new("cooldown_ms must be greater than 0").into());
        }
        if self.global_max <= self.max_per_url {
            return Err(ConfigError::new(format!(
                "global_max ({}) must be greater than max_per_url ({})",
                self.global_max, self.max_per_url
            ))
            .into());
        }
        if self.cleanup_interval_ms == Some(0) {
            return Err(ConfigError::new("cleanup_interval_ms must be greater than 0").into());
        }
        Ok(())
    }

    /// Load the `[throttle]` table from a TOML file.
    ///
    /// Missing keys fall back to defaults; a missing table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DocketResult<Self> {
        debug!("Loading throttle configuration from file");

        let path = path.as_ref();
        let section: ThrottleSection = Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                DocketError::from(ConfigError::for_path(
                    path,
                    format!("Failed to read configuration: {}", e),
                ))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocketError::from(ConfigError::for_path(
                    path,
                    format!("Failed to parse throttle configuration: {}", e),
                ))
            })?;

        section.throttle.validate()?;
        Ok(section.throttle)
    }
}
