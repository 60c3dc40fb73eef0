//! Command-line interface definitions for the headlines daemon.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Options can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the market headlines daemon.
///
/// # Examples
///
/// ```sh
/// # Run the background refresh daemon with defaults
/// market_headlines
///
/// # Custom config and a JSON drop directory for a file server
/// market_headlines -c ./config.yaml -j ./public/api
///
/// # One-shot: fetch if stale, print the snapshot, exit
/// market_headlines --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "MARKET_HEADLINES_CONFIG")]
    pub config: Option<String>,

    /// Directory to drop headlines.json into after each refresh
    #[arg(short, long, env = "MARKET_HEADLINES_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Override the configured refresh interval, in minutes
    #[arg(long)]
    pub interval_mins: Option<u64>,

    /// Refresh once (TTL-gated), print the snapshot to stdout, and exit
    #[arg(long)]
    pub once: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["market_headlines"]);
        assert!(cli.config.is_none());
        assert!(cli.json_output_dir.is_none());
        assert!(cli.interval_mins.is_none());
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "market_headlines",
            "-c",
            "./config.yaml",
            "-j",
            "./public/api",
            "--interval-mins",
            "5",
            "--once",
        ]);

        assert_eq!(cli.config.as_deref(), Some("./config.yaml"));
        assert_eq!(cli.json_output_dir.as_deref(), Some("./public/api"));
        assert_eq!(cli.interval_mins, Some(5));
        assert!(cli.once);
    }
}
