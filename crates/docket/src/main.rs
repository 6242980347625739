//! Docket CLI binary.
//!
//! - Print the effective configuration
//! - Issue throttled requests against the records backend

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, fetch, show_config};

    let cli = Cli::parse();

    docket::init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Config { file } => {
            show_config(file.as_deref())?;
        }

        Commands::Fetch {
            url,
            method,
            repeat,
            body,
            file,
        } => {
            fetch(&url, &method, repeat, body.as_deref(), file.as_deref()).await?;
        }
    }

    Ok(())
}
