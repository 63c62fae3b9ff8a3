//! Document insertion façade
//!
//! [`DocumentInserter`] owns one store session and exposes insert-one,
//! insert-many and upsert-one. Documents are forwarded to the store
//! unmodified; only the responses are shaped (identifiers normalized to
//! strings, store failures mapped to [`InserterError`]).

use crate::adapters::store::{create_document_store, DocumentStore};
use crate::config::InserterConfig;
use crate::domain::{
    BatchInsertFailure, CollectionName, CollectionRef, Document, DocumentId, InsertError,
    InserterError, Result, StoreError, UpsertError, UpsertOutcome,
};
use mongodb::bson::doc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Insertion façade over a document store session
///
/// Every operation returns a [`Result`]; failures are logged and returned,
/// never panicked. After [`close`](Self::close) all operations fail with
/// [`InserterError::ClosedConnection`].
///
/// # Example
///
/// ```rust
/// use inserter::adapters::memory::MemoryStore;
/// use inserter::core::DocumentInserter;
/// use mongodb::bson::doc;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> inserter::domain::Result<()> {
/// let inserter = DocumentInserter::new(Arc::new(MemoryStore::new("mcp_database")));
///
/// let id = inserter
///     .insert_one("blocks", doc! { "id": "minecraft:stone", "hardness": 1.5 })
///     .await?;
/// assert!(!id.as_str().is_empty());
///
/// inserter.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct DocumentInserter {
    /// Open session; `None` once closed
    store: Mutex<Option<Arc<dyn DocumentStore>>>,

    /// Database the session is bound to
    database_name: String,
}

impl DocumentInserter {
    /// Wrap an already open store session
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let database_name = store.database_name().to_string();
        Self {
            store: Mutex::new(Some(store)),
            database_name,
        }
    }

    /// Open a session from configuration and select its database
    ///
    /// # Errors
    ///
    /// Returns [`InserterError::Connection`] if the store cannot be reached.
    /// The caller decides whether that is fatal.
    pub async fn connect(config: &InserterConfig) -> Result<Self> {
        let store = create_document_store(config).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to document store");
            e
        })?;

        tracing::info!(
            backend = store.backend_name(),
            database = %store.database_name(),
            "Connected to document store"
        );
        Ok(Self::new(store))
    }

    /// Name of the selected database
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Whether [`close`](Self::close) has been called
    pub async fn is_closed(&self) -> bool {
        self.store.lock().await.is_none()
    }

    /// Reference to a named collection
    ///
    /// Pure lookup: the collection is not required to exist, as document
    /// stores create collections on first write.
    ///
    /// # Errors
    ///
    /// Returns [`InserterError::Validation`] if the name is empty or uses
    /// characters the store forbids.
    pub fn get_collection(&self, name: &str) -> Result<CollectionRef> {
        let name = CollectionName::new(name).map_err(InserterError::Validation)?;
        Ok(CollectionRef::new(self.database_name.clone(), name))
    }

    /// Insert a single document
    ///
    /// # Returns
    ///
    /// The store-assigned identifier in string form.
    ///
    /// # Errors
    ///
    /// - [`InserterError::Validation`] for an empty collection name or document
    /// - [`InserterError::Insert`] if the store refuses the write
    /// - [`InserterError::ClosedConnection`] after [`close`](Self::close)
    pub async fn insert_one(
        &self,
        collection_name: &str,
        document: Document,
    ) -> Result<DocumentId> {
        let store = self.session().await?;
        let collection = self.get_collection(collection_name)?;
        if document.is_empty() {
            return Err(InserterError::Validation(
                "Document to insert cannot be empty".to_string(),
            ));
        }

        match store.insert_one(&collection, document).await {
            Ok(raw_id) => {
                let id = DocumentId::from_bson(&raw_id);
                tracing::info!(
                    collection = %collection,
                    document_id = %id,
                    "Document inserted"
                );
                Ok(id)
            }
            Err(e) => {
                tracing::error!(collection = %collection, error = %e, "Error inserting document");
                Err(insert_error(e, 1, false))
            }
        }
    }

    /// Insert several documents
    ///
    /// # Arguments
    ///
    /// * `collection_name` - Target collection
    /// * `documents` - Documents to insert; must not be empty
    /// * `ordered` - If true, the store stops at the first failing document.
    ///   Documents written before the failure stay committed.
    ///
    /// # Returns
    ///
    /// Identifiers of all documents, in input order.
    ///
    /// # Errors
    ///
    /// When only part of the batch is written, returns
    /// [`InsertError::Batch`] whose [`BatchInsertFailure::committed`] lists
    /// the identifiers that were persisted.
    pub async fn insert_many(
        &self,
        collection_name: &str,
        documents: Vec<Document>,
        ordered: bool,
    ) -> Result<Vec<DocumentId>> {
        let store = self.session().await?;
        let collection = self.get_collection(collection_name)?;
        if documents.is_empty() {
            return Err(InserterError::Validation(
                "Document batch cannot be empty".to_string(),
            ));
        }
        if let Some(index) = documents.iter().position(Document::is_empty) {
            return Err(InserterError::Validation(format!(
                "Document at index {index} is empty"
            )));
        }
        let attempted = documents.len();

        match store.insert_many(&collection, documents, ordered).await {
            Ok(raw_ids) => {
                let ids: Vec<DocumentId> = raw_ids.iter().map(DocumentId::from_bson).collect();
                tracing::info!(
                    collection = %collection,
                    count = ids.len(),
                    ordered = ordered,
                    "Inserted documents"
                );
                Ok(ids)
            }
            Err(e) => {
                let err = insert_error(e, attempted, ordered);
                if let InserterError::Insert(InsertError::Batch(failure)) = &err {
                    tracing::error!(
                        collection = %collection,
                        committed = failure.committed.len(),
                        failed = failure.failures.len(),
                        skipped = failure.skipped(),
                        ordered = ordered,
                        "Error inserting documents"
                    );
                } else {
                    tracing::error!(collection = %collection, error = %err, "Error inserting documents");
                }
                Err(err)
            }
        }
    }

    /// Update the document matching `filter`, or insert it if none matches
    ///
    /// `update_data` is applied with `$set` semantics: listed fields are
    /// written, all other fields are left alone. A created document holds
    /// the filter's equality fields plus `update_data`.
    ///
    /// # Errors
    ///
    /// - [`InserterError::Validation`] for an empty filter or update
    /// - [`UpsertError::Inconsistent`] if the store reports neither a match
    ///   nor an inserted document
    /// - [`InserterError::Upsert`] for other store failures
    pub async fn upsert_one(
        &self,
        collection_name: &str,
        filter: Document,
        update_data: Document,
    ) -> Result<UpsertOutcome> {
        let store = self.session().await?;
        let collection = self.get_collection(collection_name)?;
        if filter.is_empty() {
            return Err(InserterError::Validation(
                "Upsert filter cannot be empty".to_string(),
            ));
        }
        if update_data.is_empty() {
            return Err(InserterError::Validation(
                "Upsert data cannot be empty".to_string(),
            ));
        }

        let summary = store
            .update_one(&collection, filter, doc! { "$set": update_data }, true)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, error = %e, "Error upserting document");
                upsert_error(e)
            })?;

        let outcome = match summary.upserted_id {
            Some(raw_id) => UpsertOutcome::Inserted {
                id: DocumentId::from_bson(&raw_id),
            },
            None if summary.matched_count > 0 => UpsertOutcome::Updated {
                matched: summary.matched_count,
                modified: summary.modified_count,
            },
            None => {
                tracing::error!(
                    collection = %collection,
                    matched = summary.matched_count,
                    "Upsert reported no match and no inserted document"
                );
                return Err(UpsertError::Inconsistent {
                    matched: summary.matched_count,
                }
                .into());
            }
        };

        match &outcome {
            UpsertOutcome::Inserted { id } => {
                tracing::info!(collection = %collection, document_id = %id, "Document upserted");
            }
            UpsertOutcome::Updated { matched, modified } => {
                tracing::info!(
                    collection = %collection,
                    matched = matched,
                    modified = modified,
                    "Document updated"
                );
            }
        }
        Ok(outcome)
    }

    /// Read a document back by its normalized identifier
    ///
    /// A document whose `_id` is exactly the id text wins over one whose
    /// ObjectId or integer `_id` normalizes to the same text.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no document has that identifier.
    pub async fn find_by_id(
        &self,
        collection_name: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>> {
        let store = self.session().await?;
        let collection = self.get_collection(collection_name)?;

        let read_error = |e: StoreError| match e {
            StoreError::Closed => InserterError::ClosedConnection,
            StoreError::Unavailable(msg) => InserterError::Connection(msg),
            other => InserterError::Other(format!("Failed to read document: {other}")),
        };

        // Exact string match first, then the typed form
        if let Some(document) = store
            .find_one(&collection, id.to_filter())
            .await
            .map_err(read_error)?
        {
            return Ok(Some(document));
        }
        match id.typed_filter() {
            Some(filter) => store.find_one(&collection, filter).await.map_err(read_error),
            None => Ok(None),
        }
    }

    /// Release the store session
    ///
    /// Idempotent: later calls do nothing. The session is considered
    /// released even if the store reports an error while closing.
    pub async fn close(&self) -> Result<()> {
        let Some(store) = self.store.lock().await.take() else {
            tracing::debug!(database = %self.database_name, "Connection already closed");
            return Ok(());
        };

        store.close().await.map_err(|e| {
            tracing::warn!(error = %e, "Error while closing document store");
            InserterError::Connection(format!("Failed to close connection: {e}"))
        })?;

        tracing::info!(database = %self.database_name, "Document store connection closed");
        Ok(())
    }

    async fn session(&self) -> Result<Arc<dyn DocumentStore>> {
        self.store
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(InserterError::ClosedConnection)
    }
}

impl Drop for DocumentInserter {
    fn drop(&mut self) {
        if self.store.get_mut().take().is_some() {
            tracing::warn!(
                database = %self.database_name,
                "DocumentInserter dropped without close(); releasing connection"
            );
        }
    }
}

/// Map a store failure from an insert path
fn insert_error(err: StoreError, attempted: usize, ordered: bool) -> InserterError {
    match err {
        StoreError::Closed => InserterError::ClosedConnection,
        StoreError::DuplicateKey(msg) => InsertError::DuplicateKey(msg).into(),
        StoreError::Rejected(msg) => InsertError::Rejected(msg).into(),
        StoreError::Unavailable(msg) => InsertError::Unavailable(msg).into(),
        StoreError::PartialBatch {
            committed,
            failures,
        } => InsertError::Batch(BatchInsertFailure {
            committed: committed.iter().map(DocumentId::from_bson).collect(),
            attempted,
            ordered,
            failures,
        })
        .into(),
    }
}

/// Map a store failure from the upsert path
fn upsert_error(err: StoreError) -> InserterError {
    match err {
        StoreError::Closed => InserterError::ClosedConnection,
        StoreError::Unavailable(msg) => UpsertError::Unavailable(msg).into(),
        other => UpsertError::Rejected(other.to_string()).into(),
    }
}
