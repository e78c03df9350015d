//! CLI definitions for hostwatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hostwatch CLI.
#[derive(Parser)]
#[command(name = "hostwatch")]
#[command(about = "Periodic host health monitor with alerting")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (.json or .toml)
    #[arg(short, long, env = "HOSTWATCH_CONFIG", default_value = "config.json", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Run health checks periodically until interrupted (default)
    Run,

    /// Run a single health cycle and exit
    Check,

    /// Validate the configuration file and exit
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["hostwatch"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["hostwatch", "check", "--config", "/etc/hostwatch.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
        assert_eq!(cli.config, PathBuf::from("/etc/hostwatch.toml"));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["hostwatch", "restart"]).is_err());
    }
}
