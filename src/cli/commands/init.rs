//! Init command implementation
//!
//! Writes a sample `inserter.toml` that loads as-is once
//! `INSERTER_MONGODB_URI` is set.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "inserter.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Inserter configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set INSERTER_MONGODB_URI (or add it to a .env file)");
                println!("  2. Adjust database_name in {}", self.output);
                println!("  3. Validate configuration: inserter validate-config");
                println!("  4. Check connectivity: inserter check");
                println!();
                Ok(0)
            }
            Err(e) => {
                tracing::error!(output = %self.output, error = %e, "Failed to write configuration");
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# Inserter Configuration File

# Store backend: mongodb | memory
store_target = "mongodb"

[application]
# trace | debug | info | warn | error
log_level = "info"

[mongodb]
# Credentials belong in the environment, not in this file
connection_string = "${INSERTER_MONGODB_URI}"
database_name = "mcp_database"
app_name = "inserter"
connect_timeout_seconds = 10
server_selection_timeout_seconds = 30

# Used when store_target = "memory"
[memory]
database_name = "mcp_database"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "/var/log/inserter"
# daily | hourly | never
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, StoreTarget};
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_sections() {
        let config = InitArgs::sample_config();
        assert!(config.contains("store_target"));
        assert!(config.contains("[mongodb]"));
        assert!(config.contains("[logging]"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: crate::config::InserterConfig =
            toml::from_str(InitArgs::sample_config()).unwrap();
        assert_eq!(config.store_target, StoreTarget::MongoDB);
        assert_eq!(config.database_name(), "mcp_database");
    }

    #[tokio::test]
    async fn test_init_writes_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("inserter.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(output.exists());
        assert_eq!(args.execute().await.unwrap(), 2);

        let forced = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: true,
        };
        assert_eq!(forced.execute().await.unwrap(), 0);

        // Memory target loads without any environment
        std::fs::write(
            &output,
            InitArgs::sample_config().replace("store_target = \"mongodb\"", "store_target = \"memory\"")
                .replace("\"${INSERTER_MONGODB_URI}\"", "\"mongodb://localhost:27017/\""),
        )
        .unwrap();
        let loaded = load_config(&output).unwrap();
        assert_eq!(loaded.store_target, StoreTarget::Memory);
    }
}
