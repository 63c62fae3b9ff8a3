//! Configuration management for Inserter.
//!
//! Configuration lives in a TOML file (default `inserter.toml`) and supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `INSERTER_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! store_target = "mongodb"
//!
//! [application]
//! log_level = "info"
//!
//! [mongodb]
//! connection_string = "${INSERTER_MONGODB_URI}"
//! database_name = "mcp_database"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/inserter"
//! local_rotation = "daily"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use inserter::config::load_config;
//!
//! # fn example() {
//! match load_config("inserter.toml") {
//!     Ok(config) => println!("Target: {:?}", config.store_target),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, InserterConfig, LoggingConfig, MemoryConfig, MongoDbConfig, StoreTarget,
};
pub use secret::{secret_string, SecretString, SecretValue};
