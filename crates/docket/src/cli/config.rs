//! Configuration command handler.

use docket::{ConfigError, DocketConfig, DocketError, DocketResult};
use std::path::Path;
use tracing::debug;

/// Load from `file` when given, otherwise from the layered sources.
pub fn load_config(file: Option<&Path>) -> DocketResult<DocketConfig> {
    match file {
        Some(path) => DocketConfig::from_file(path),
        None => DocketConfig::load(),
    }
}

/// Print the effective configuration.
pub fn show_config(file: Option<&Path>) -> DocketResult<()> {
    let config = load_config(file)?;
    debug!(?config, "Resolved configuration");

    let rendered = toml::to_string_pretty(&config).map_err(|e| {
        DocketError::from(ConfigError::new(format!(
            "Failed to render configuration: {}",
            e
        )))
    })?;
    print!("{rendered}");
    Ok(())
}
