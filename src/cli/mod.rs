//! CLI module for Customer Hub
//!
//! Provides command-line interface parsing for the customer-hub binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Customer Hub - customer accounts and authentication server
#[derive(Parser, Debug)]
#[command(
    name = "customer-hub",
    version,
    about = "Customer Hub - customer accounts and authentication server",
    long_about = "Customer accounts with password login, signed access tokens and\n\
                  role-based authorization over a REST API.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  customer-hub                            # Start the server (reads customers.toml)\n    \
                  customer-hub --config prod.toml         # Use a custom config file\n    \
                  customer-hub config --validate          # Check the configuration and exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "customers.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show the effective configuration
    Config {
        /// Validate the configuration and the JWT secret, then exit
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter directive, `--verbose` overriding the configured level.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            configured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["customer-hub"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("customers.toml"));
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level("warn"), "warn");
    }

    #[test]
    fn test_config_subcommand_with_global_flags() {
        let cli = Cli::try_parse_from([
            "customer-hub",
            "config",
            "--validate",
            "--config",
            "other.toml",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::Config { validate: true }));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.log_level("info"), "debug");
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["customer-hub", "init"]).is_err());
    }
}
