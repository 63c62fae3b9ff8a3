//! Validate config command implementation

use crate::config::{load_config, StoreTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);

        match config.store_target {
            StoreTarget::MongoDB => {
                if let Some(ref mongo) = config.mongodb {
                    println!("  Store Target: MongoDB");
                    println!("  MongoDB Host: {}", mongo.redacted_host());
                    println!("  Database: {}", mongo.database_name);
                    println!("  App Name: {}", mongo.app_name);
                    println!(
                        "  Timeouts: connect {}s, server selection {}s",
                        mongo.connect_timeout_seconds, mongo.server_selection_timeout_seconds
                    );
                }
            }
            StoreTarget::Memory => {
                println!("  Store Target: in-memory (nothing is persisted)");
                println!("  Database: {}", config.database_name());
            }
        }

        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
