//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docket - records-management client with a client-side request governor
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(about = "Records-management client with a client-side request governor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration as TOML
    Config {
        /// Read this file instead of the layered defaults
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Issue one or more throttled requests and print each outcome
    Fetch {
        /// Absolute URL, or a path joined onto `client.base_url`
        url: String,

        /// HTTP method
        #[arg(long, short = 'X', default_value = "GET")]
        method: String,

        /// Number of back-to-back requests
        #[arg(long, short = 'n', default_value = "1")]
        repeat: u32,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Read this file instead of the layered defaults
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["docket", "fetch", "/api/agencies"]).unwrap();
        match cli.command {
            Commands::Fetch {
                url,
                method,
                repeat,
                body,
                file,
            } => {
                assert_eq!(url, "/api/agencies");
                assert_eq!(method, "GET");
                assert_eq!(repeat, 1);
                assert!(body.is_none());
                assert!(file.is_none());
            }
            other => panic!("expected fetch, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_fetch_with_options() {
        let cli = Cli::try_parse_from([
            "docket",
            "-v",
            "fetch",
            "/api/dispatch-orders",
            "-X",
            "post",
            "-n",
            "3",
            "--body",
            r#"{"order":7}"#,
            "--file",
            "local.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Fetch {
            method,
            repeat,
            body,
            file,
            ..
        } = cli.command
        else {
            panic!("expected fetch");
        };
        assert_eq!(method, "post");
        assert_eq!(repeat, 3);
        assert_eq!(body.as_deref(), Some(r#"{"order":7}"#));
        assert_eq!(file, Some(PathBuf::from("local.toml")));
    }

    #[test]
    fn test_config_accepts_file() {
        let cli = Cli::try_parse_from(["docket", "config", "--file", "docket.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { file: Some(ref path) } if path == &PathBuf::from("docket.toml")
        ));
    }

    #[test]
    fn test_fetch_requires_url() {
        assert!(Cli::try_parse_from(["docket", "fetch"]).is_err());
    }
}
