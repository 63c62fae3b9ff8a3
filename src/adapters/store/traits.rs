//! Document store abstraction traits
//!
//! This module defines the narrow interface the insertion façade consumes
//! from a document store backend.

use crate::domain::{CollectionRef, Document, StoreError, UpdateSummary};
use async_trait::async_trait;
use mongodb::bson::Bson;

/// Result type for store adapter operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document store session trait
///
/// An implementation represents one open session against one database.
/// Collections are addressed per call through a [`CollectionRef`]; no
/// collection handle is cached between calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs (e.g. "mongodb")
    fn backend_name(&self) -> &'static str;

    /// Name of the database this session is bound to
    fn database_name(&self) -> &str;

    /// Verify the session can reach the server
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the server cannot be reached.
    async fn ping(&self) -> StoreResult<()>;

    /// Insert a single document
    ///
    /// The document is written as given. If it has no `_id`, the store
    /// assigns one.
    ///
    /// # Returns
    ///
    /// Returns the `_id` of the inserted document.
    async fn insert_one(&self, collection: &CollectionRef, document: Document)
        -> StoreResult<Bson>;

    /// Insert several documents
    ///
    /// # Arguments
    ///
    /// * `collection` - Target collection
    /// * `documents` - Documents to insert
    /// * `ordered` - If true, stop at the first failing document
    ///
    /// # Returns
    ///
    /// Returns the `_id` of every document in input order. When only some
    /// documents are written, returns [`StoreError::PartialBatch`] with the
    /// committed ids and per-document failures.
    async fn insert_many(
        &self,
        collection: &CollectionRef,
        documents: Vec<Document>,
        ordered: bool,
    ) -> StoreResult<Vec<Bson>>;

    /// Update the first document matching `filter`
    ///
    /// # Arguments
    ///
    /// * `collection` - Target collection
    /// * `filter` - Query selecting the document
    /// * `update` - Update document (operator form, e.g. `{"$set": {...}}`)
    /// * `upsert` - If true, insert a new document when nothing matches
    async fn update_one(
        &self,
        collection: &CollectionRef,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> StoreResult<UpdateSummary>;

    /// Fetch the first document matching `filter`
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no document matches.
    async fn find_one(&self, collection: &CollectionRef, filter: Document)
        -> StoreResult<Option<Document>>;

    /// Close the session and release its resources
    ///
    /// Calling this more than once must be harmless.
    async fn close(&self) -> StoreResult<()>;
}
