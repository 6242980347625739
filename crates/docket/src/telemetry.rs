//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a console subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `info,docket=debug` over
/// plain `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_directives = if verbose {
        "info,docket=debug,docket_client=debug,docket_throttle=debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}
