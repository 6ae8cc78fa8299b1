//! Command-line interface definitions for LegalCurrent Feed.
//!
//! Every option can also be supplied through the environment.

use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the API on the default address
/// legalcurrent_feed
///
/// # Serve on all interfaces with a tighter per-source timeout
/// legalcurrent_feed --bind 0.0.0.0:8080 --timeout-secs 4
///
/// # Fetch once and write the listing to a file
/// legalcurrent_feed --once --output ./out/latest.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(short, long, env = "LEGALCURRENT_BIND", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// Optional path to a YAML file overriding source URLs and fetch settings
    #[arg(short, long, env = "LEGALCURRENT_CONFIG")]
    pub config: Option<String>,

    /// Per-source fetch timeout in seconds (overrides the config file)
    #[arg(long, env = "LEGALCURRENT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Fetch every source once, print the JSON listing and exit
    #[arg(long)]
    pub once: bool,

    /// With --once, write the listing to this file instead of stdout
    #[arg(short, long, requires = "once")]
    pub output: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["legalcurrent_feed"]);
        assert_eq!(cli.bind, "127.0.0.1:5000");
        assert!(!cli.once);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "legalcurrent_feed",
            "-b",
            "0.0.0.0:8080",
            "-c",
            "/etc/legalcurrent.yaml",
        ]);
        assert_eq!(cli.bind, "0.0.0.0:8080");
        assert_eq!(cli.config.as_deref(), Some("/etc/legalcurrent.yaml"));
    }

    #[test]
    fn test_cli_once_with_output() {
        let cli = Cli::parse_from([
            "legalcurrent_feed",
            "--once",
            "--output",
            "/tmp/latest.json",
            "--timeout-secs",
            "3",
        ]);
        assert!(cli.once);
        assert_eq!(cli.output.as_deref(), Some("/tmp/latest.json"));
        assert_eq!(cli.timeout_secs, Some(3));
    }

    #[test]
    fn test_output_requires_once() {
        let res = Cli::try_parse_from(["legalcurrent_feed", "--output", "/tmp/x.json"]);
        assert!(res.is_err());
    }
}
