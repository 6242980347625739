//! Layered client configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`docket.toml` shipped with the library)
//! 2. `~/.config/docket/docket.toml`
//! 3. `./docket.toml`

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use docket_error::{ConfigError, DocketError, DocketErrorKind, DocketResult};
use docket_throttle::ThrottleConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Transport settings for [`ThrottledClient`](crate::ThrottledClient).
///
/// ```toml
/// [client]
/// base_url = "https://records.example.org"
/// timeout_secs = 30
/// user_agent = "docket/0.2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default)]
pub struct ClientConfig {
    /// Prefix joined onto relative request paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    base_url: Option<String>,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    #[builder(setter(into))]
    user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("docket/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level Docket configuration.
///
/// # Example
///
/// ```no_run
/// use docket_client::DocketConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DocketConfig::load()?;
/// println!("Per-endpoint limit: {}", config.throttle.max_per_url());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocketConfig {
    /// Request governor tunables.
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub client: ClientConfig,
}

impl DocketConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DocketResult<Self> {
        debug!("Loading configuration from file");

        let path = path.as_ref();
        let builder = Config::builder().add_source(File::from(path));
        Self::build(builder).map_err(|e| match e.kind() {
            DocketErrorKind::Config(err) if err.path.is_none() => {
                DocketError::from(ConfigError::for_path(path, err.message.clone()))
            }
            _ => e,
        })
    }

    /// Load configuration with precedence: current dir > home dir > bundled default.
    ///
    /// User config files are optional and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the merged values
    /// fail validation.
    #[instrument]
    pub fn load() -> DocketResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../docket.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/docket/docket.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("docket").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> DocketResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                DocketError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocketError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.throttle.validate()?;
        Ok(config)
    }
}
