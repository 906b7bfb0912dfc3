//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for nerscrub using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration problems
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when detection failed for at least one document
pub const EXIT_DETECTION: i32 = 3;
/// Exit code for unexpected failures
pub const EXIT_FATAL: i32 = 5;

/// nerscrub - find and redact names, organizations and locations
#[derive(Parser, Debug)]
#[command(name = "nerscrub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "nerscrub.toml", env = "NERSCRUB_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NERSCRUB_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect entities and print them as JSON
    Detect(commands::detect::DetectArgs),

    /// Print the input with entities redacted
    Clean(commands::clean::CleanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_detect() {
        let cli = Cli::parse_from(["nerscrub", "detect"]);
        assert_eq!(cli.config, "nerscrub.toml");
        assert!(matches!(cli.command, Commands::Detect(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["nerscrub", "--config", "custom.toml", "clean"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Clean(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["nerscrub", "--log-level", "debug", "detect"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["nerscrub", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["nerscrub", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
