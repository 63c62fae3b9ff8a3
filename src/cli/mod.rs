//! CLI interface and argument parsing
//!
//! The binary is a thin operational wrapper around the library: it can
//! scaffold, validate and check a configuration. Inserting documents is
//! done by embedding [`crate::core::DocumentInserter`].

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Inserter - document store insertion utility
#[derive(Parser, Debug)]
#[command(name = "inserter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "inserter.toml", env = "INSERTER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "INSERTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute; prints usage guidance when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Connect to the configured store, ping it and disconnect
    Check(commands::check::CheckArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and logging section the binary starts with
    ///
    /// `--log-level` wins over `application.log_level`. When the
    /// configuration file cannot be loaded, logging goes to the console
    /// only at `info`; the subcommand reports the load error itself.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        match load_config(&self.config) {
            Ok(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            Err(_) => (
                self.log_level.clone().unwrap_or_else(|| "info".to_string()),
                LoggingConfig::default(),
            ),
        }
    }
}

/// Text shown when the binary runs without a subcommand
pub fn usage_guidance() -> String {
    format!(
        "Inserter {} - document insertion utility for MongoDB.\n\
         \n\
         This crate is meant to be used as a library:\n\
         \n\
         \x20   use inserter::core::DocumentInserter;\n\
         \x20   let inserter = DocumentInserter::connect(&config).await?;\n\
         \x20   let id = inserter.insert_one(\"blocks\", doc! {{ \"id\": \"minecraft:stone\" }}).await?;\n\
         \x20   inserter.close().await?;\n\
         \n\
         Run `inserter --help` for the available commands.",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_without_subcommand() {
        let cli = Cli::parse_from(["inserter"]);
        assert_eq!(cli.config, "inserter.toml");
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["inserter", "--config", "custom.toml", "check"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Some(Commands::Check(_))));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["inserter", "-l", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Some(Commands::ValidateConfig(_))));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["inserter", "init", "--output", "x.toml", "--force"]);
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.output, "x.toml");
                assert!(args.force);
            }
            other => panic!("expected init, got {other:?}"),
        }
    }

    #[test]
    fn test_usage_guidance_mentions_library() {
        let text = usage_guidance();
        assert!(text.contains("DocumentInserter"));
        assert!(text.contains("--help"));
    }

    #[test]
    fn test_logging_settings_follow_config_file() {
        use std::io::Write;

        let log_dir = tempfile::tempdir().unwrap();
        let toml_content = format!(
            "store_target = \"memory\"\n\n[application]\nlog_level = \"debug\"\n\n[memory]\n\n[logging]\nlocal_enabled = true\nlocal_path = \"{}\"\nlocal_rotation = \"hourly\"\n",
            log_dir.path().display()
        );
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let cli = Cli::parse_from(["inserter", "--config", path, "check"]);
        let (level, logging) = cli.logging_settings();
        assert_eq!(level, "debug");
        assert!(logging.local_enabled);
        assert_eq!(logging.local_path, log_dir.path().display().to_string());
        assert_eq!(logging.local_rotation, "hourly");

        let cli = Cli::parse_from(["inserter", "--config", path, "-l", "warn", "check"]);
        assert_eq!(cli.logging_settings().0, "warn");
    }

    #[test]
    fn test_logging_settings_without_config_file() {
        let cli = Cli::parse_from(["inserter", "--config", "missing-inserter.toml", "init"]);
        let (level, logging) = cli.logging_settings();
        assert_eq!(level, cli.log_level.unwrap_or_else(|| "info".to_string()));
        assert!(!logging.local_enabled);
    }
}
