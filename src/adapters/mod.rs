//! External system integrations for Inserter.
//!
//! This module provides adapters for document store backends:
//!
//! - [`store`] - Document store abstraction layer (trait-based)
//! - [`mongo`] - MongoDB implementation
//! - [`memory`] - In-process implementation for dry runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the database driver
//! and enable testing without a server. Driver errors are mapped to
//! [`StoreError`](crate::domain::StoreError) at this boundary.
//!
//! # MongoDB Adapter
//!
//! ```rust,no_run
//! use inserter::adapters::mongo::MongoStore;
//! use inserter::config::{secret_string, MongoDbConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MongoDbConfig {
//!     connection_string: secret_string("mongodb://localhost:27017/".to_string()),
//!     database_name: "mcp_database".to_string(),
//!     app_name: "inserter".to_string(),
//!     connect_timeout_seconds: 10,
//!     server_selection_timeout_seconds: 30,
//! };
//!
//! let store = MongoStore::connect(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod mongo;
pub mod store;
