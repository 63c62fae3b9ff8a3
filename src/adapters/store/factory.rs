//! Document store factory
//!
//! This module provides the factory function that opens a store session
//! based on configuration.

use crate::adapters::memory::MemoryStore;
use crate::adapters::mongo::MongoStore;
use crate::adapters::store::traits::DocumentStore;
use crate::config::schema::{InserterConfig, StoreTarget};
use crate::domain::{InserterError, Result};
use std::sync::Arc;

/// Open a document store session based on the configuration
///
/// This factory function examines `store_target` in the configuration
/// and opens the matching backend.
///
/// # Arguments
///
/// * `config` - The Inserter configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements DocumentStore
///
/// # Errors
///
/// Returns [`InserterError::Configuration`] if the selected backend has no
/// configuration section, or [`InserterError::Connection`] if the session
/// cannot be established.
pub async fn create_document_store(config: &InserterConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.store_target {
        StoreTarget::MongoDB => {
            let mongo_config = config.mongodb.as_ref().ok_or_else(|| {
                InserterError::Configuration(
                    "mongodb configuration is required when store_target = 'mongodb'".to_string(),
                )
            })?;

            tracing::info!(database = %mongo_config.database_name, "Creating MongoDB store");
            let store = MongoStore::connect(mongo_config).await?;

            Ok(Arc::new(store) as Arc<dyn DocumentStore>)
        }
        StoreTarget::Memory => {
            let database_name = config.database_name();

            tracing::info!(database = %database_name, "Creating in-memory store");
            Ok(Arc::new(MemoryStore::new(database_name)) as Arc<dyn DocumentStore>)
        }
    }
}
