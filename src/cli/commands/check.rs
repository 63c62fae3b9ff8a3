//! Check command implementation
//!
//! Opens a session against the configured store, pings it and closes it
//! again. Useful as a readiness check before running a workload.

use crate::config::load_config;
use crate::core::DocumentInserter;
use crate::domain::InserterError;
use crate::log_error_with_context;
use clap::Args;
use std::time::Instant;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("🔌 Connecting to {:?} store", config.store_target);
        let started = Instant::now();

        let inserter = match DocumentInserter::connect(&config).await {
            Ok(inserter) => inserter,
            Err(e @ InserterError::Connection(_)) => {
                log_error_with_context!(&e, "Document store unreachable");
                println!("❌ Failed to connect to document store");
                println!("   Error: {e}");
                return Ok(4);
            }
            Err(e @ InserterError::Configuration(_)) => {
                println!("❌ Configuration error");
                println!("   Error: {e}");
                return Ok(2);
            }
            Err(e) => return Err(e.into()),
        };

        println!(
            "✅ Connected to database '{}' in {} ms",
            inserter.database_name(),
            started.elapsed().as_millis()
        );
        if let Err(e) = inserter.close().await {
            log_error_with_context!(&e, "Closing document store session");
            println!("⚠️  Connection did not close cleanly: {e}");
        }
        Ok(0)
    }
}
