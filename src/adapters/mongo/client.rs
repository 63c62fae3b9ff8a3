//! MongoDB store implementation
//!
//! This module provides the [`DocumentStore`] backend for MongoDB using the
//! official `mongodb` driver.

use super::errors::{map_insert_many_error, map_session_error, map_write_error};
use crate::adapters::store::{DocumentStore, StoreResult};
use crate::config::MongoDbConfig;
use crate::domain::{CollectionRef, Document, InserterError, Result, StoreError, UpdateSummary};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// MongoDB session bound to one database
///
/// Wraps a driver [`Client`] (which manages its own connection pool) and the
/// selected [`Database`].
pub struct MongoStore {
    /// Driver client
    client: Client,

    /// Selected database
    database: Database,

    /// Set once `close()` has run
    closed: AtomicBool,
}

impl MongoStore {
    /// Open a session and select the configured database
    ///
    /// Parses the connection string, applies timeouts and application name,
    /// then pings the server so that an unreachable target fails here rather
    /// than on the first write.
    ///
    /// # Arguments
    ///
    /// * `config` - MongoDB configuration
    ///
    /// # Errors
    ///
    /// Returns [`InserterError::Connection`] if the connection string is
    /// invalid or the server cannot be reached.
    pub async fn connect(config: &MongoDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let mut options = ClientOptions::parse(config.connection_string.expose_secret().as_ref())
            .await
            .map_err(|e| {
                InserterError::Connection(format!("Invalid MongoDB connection string: {e}"))
            })?;

        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_seconds));
        options.server_selection_timeout = Some(Duration::from_secs(
            config.server_selection_timeout_seconds,
        ));

        let client = Client::with_options(options).map_err(|e| {
            InserterError::Connection(format!("Failed to create MongoDB client: {e}"))
        })?;
        let database = client.database(&config.database_name);

        let store = Self {
            client,
            database,
            closed: AtomicBool::new(false),
        };

        if let Err(e) = store.ping().await {
            // Release the half-open client before reporting
            store.client.clone().shutdown().await;
            return Err(InserterError::Connection(format!(
                "Failed to connect to MongoDB: {e}"
            )));
        }

        tracing::info!(database = %config.database_name, "Connected to MongoDB database");
        Ok(store)
    }

    fn collection(&self, collection: &CollectionRef) -> StoreResult<Collection<Document>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(self.database.collection::<Document>(collection.name().as_str()))
    }
}

/// Assign a client-side ObjectId when `_id` is absent, as the driver would
///
/// Knowing every id up front lets a failed batch report exactly which
/// documents were committed.
fn with_object_id(document: Document) -> (Bson, Document) {
    if let Some(id) = document.get("_id").cloned() {
        return (id, document);
    }
    let id = Bson::ObjectId(ObjectId::new());
    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in document {
        stored.insert(key, value);
    }
    (id, stored)
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_session_error)?;
        Ok(())
    }

    async fn insert_one(
        &self,
        collection: &CollectionRef,
        document: Document,
    ) -> StoreResult<Bson> {
        let result = self
            .collection(collection)?
            .insert_one(document)
            .await
            .map_err(map_write_error)?;
        Ok(result.inserted_id)
    }

    async fn insert_many(
        &self,
        collection: &CollectionRef,
        documents: Vec<Document>,
        ordered: bool,
    ) -> StoreResult<Vec<Bson>> {
        let collection = self.collection(collection)?;
        let (ids, documents): (Vec<Bson>, Vec<Document>) =
            documents.into_iter().map(with_object_id).unzip();

        collection
            .insert_many(documents)
            .ordered(ordered)
            .await
            .map_err(|e| map_insert_many_error(e, &ids, ordered))?;
        Ok(ids)
    }

    async fn update_one(
        &self,
        collection: &CollectionRef,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> StoreResult<UpdateSummary> {
        let result = self
            .collection(collection)?
            .update_one(filter, update)
            .upsert(upsert)
            .await
            .map_err(map_write_error)?;

        Ok(UpdateSummary {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    async fn find_one(
        &self,
        collection: &CollectionRef,
        filter: Document,
    ) -> StoreResult<Option<Document>> {
        self.collection(collection)?
            .find_one(filter)
            .await
            .map_err(map_session_error)
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.client.clone().shutdown().await;
        tracing::info!(database = %self.database.name(), "MongoDB connection closed");
        Ok(())
    }
}
