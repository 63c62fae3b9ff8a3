//! In-memory store implementation
//!
//! A [`DocumentStore`] that keeps collections in process memory. It mirrors
//! the write semantics of a real document store closely enough for dry runs
//! and tests: generated ObjectIds, `_id` uniqueness, ordered and unordered
//! batch inserts, and `$set` upserts.

use super::matcher::{apply_update, equality_fields, matches, set_path, values_equal};
use crate::adapters::store::{DocumentStore, StoreResult};
use crate::domain::{BatchWriteFailure, CollectionRef, Document, StoreError, UpdateSummary};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process document store
pub struct MemoryStore {
    /// Database name reported to callers
    database_name: String,

    /// Documents keyed by collection name, in insertion order
    collections: RwLock<HashMap<String, Vec<Document>>>,

    /// Set once `close()` has run
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store for `database_name`
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            collections: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of documents currently held in `collection`
    pub async fn count(&self, collection: &CollectionRef) -> usize {
        self.collections
            .read()
            .await
            .get(collection.name().as_str())
            .map_or(0, Vec::len)
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

/// Give the document an `_id` if it lacks one, keeping `_id` first
fn with_id(document: Document) -> (Bson, Document) {
    let id_first = document.keys().next().map(String::as_str) == Some("_id");
    let id = match document.get("_id").cloned() {
        Some(id) if id_first => return (id, document),
        Some(id) => id,
        None => Bson::ObjectId(ObjectId::new()),
    };
    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    (id, stored)
}

fn duplicate_key_message(collection: &CollectionRef, id: &Bson) -> String {
    format!(
        "E11000 duplicate key error collection: {} index: _id_ dup key: {{ _id: {} }}",
        collection.namespace(),
        id
    )
}

/// Insert into a collection's document list, enforcing `_id` uniqueness
fn push_unique(
    documents: &mut Vec<Document>,
    collection: &CollectionRef,
    document: Document,
) -> StoreResult<Bson> {
    let (id, stored) = with_id(document);
    let taken = documents
        .iter()
        .any(|existing| existing.get("_id").is_some_and(|other| values_equal(other, &id)));
    if taken {
        return Err(StoreError::DuplicateKey(duplicate_key_message(collection, &id)));
    }
    documents.push(stored);
    Ok(id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn insert_one(
        &self,
        collection: &CollectionRef,
        document: Document,
    ) -> StoreResult<Bson> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let documents = collections
            .entry(collection.name().as_str().to_string())
            .or_default();
        push_unique(documents, collection, document)
    }

    async fn insert_many(
        &self,
        collection: &CollectionRef,
        documents: Vec<Document>,
        ordered: bool,
    ) -> StoreResult<Vec<Bson>> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let stored = collections
            .entry(collection.name().as_str().to_string())
            .or_default();

        let mut committed = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();

        for (index, document) in documents.into_iter().enumerate() {
            match push_unique(stored, collection, document) {
                Ok(id) => committed.push(id),
                Err(e) => {
                    failures.push(BatchWriteFailure {
                        index,
                        duplicate_key: matches!(e, StoreError::DuplicateKey(_)),
                        message: e.to_string(),
                    });
                    if ordered {
                        break;
                    }
                }
            }
        }

        if failures.is_empty() {
            Ok(committed)
        } else {
            Err(StoreError::PartialBatch {
                committed,
                failures,
            })
        }
    }

    async fn update_one(
        &self,
        collection: &CollectionRef,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> StoreResult<UpdateSummary> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let documents = collections
            .entry(collection.name().as_str().to_string())
            .or_default();

        for document in documents.iter_mut() {
            if matches(document, &filter)? {
                let mut updated = document.clone();
                let changed = apply_update(&mut updated, &update)?;
                *document = updated;
                return Ok(UpdateSummary {
                    matched_count: 1,
                    modified_count: u64::from(changed),
                    upserted_id: None,
                });
            }
        }

        if !upsert {
            return Ok(UpdateSummary::default());
        }

        let mut seed = Document::new();
        for (path, value) in equality_fields(&filter) {
            set_path(&mut seed, path, value)?;
        }
        apply_update(&mut seed, &update)?;

        let id = push_unique(documents, collection, seed)?;
        Ok(UpdateSummary {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn find_one(
        &self,
        collection: &CollectionRef,
        filter: Document,
    ) -> StoreResult<Option<Document>> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection.name().as_str()) else {
            return Ok(None);
        };
        for document in documents {
            if matches(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(database = %self.database_name, "In-memory store closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CollectionName;
    use mongodb::bson::doc;

    fn blocks() -> CollectionRef {
        CollectionRef::new("test_db", CollectionName::new("blocks").unwrap())
    }

    #[tokio::test]
    async fn test_insert_one_generates_object_id_first() {
        let store = MemoryStore::new("test_db");
        let id = store
            .insert_one(&blocks(), doc! { "id": "minecraft:stone" })
            .await
            .unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));

        let stored = store
            .find_one(&blocks(), doc! { "_id": id })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored.get_str("id").unwrap(), "minecraft:stone");
    }

    #[tokio::test]
    async fn test_insert_one_duplicate_id() {
        let store = MemoryStore::new("test_db");
        store.insert_one(&blocks(), doc! { "_id": 1 }).await.unwrap();
        let result = store.insert_one(&blocks(), doc! { "_id": 1 }).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(_))));
        assert_eq!(store.count(&blocks()).await, 1);
    }

    #[tokio::test]
    async fn test_insert_many_ordered_stops_at_first_failure() {
        let store = MemoryStore::new("test_db");
        let documents = vec![doc! { "_id": 1 }, doc! { "_id": 1 }, doc! { "_id": 2 }];

        let result = store.insert_many(&blocks(), documents, true).await;
        match result {
            Err(StoreError::PartialBatch {
                committed,
                failures,
            }) => {
                assert_eq!(committed, vec![Bson::Int32(1)]);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert!(failures[0].duplicate_key);
            }
            other => panic!("expected partial batch, got {other:?}"),
        }
        assert_eq!(store.count(&blocks()).await, 1);
    }

    #[tokio::test]
    async fn test_insert_many_unordered_continues() {
        let store = MemoryStore::new("test_db");
        let documents = vec![doc! { "_id": 1 }, doc! { "_id": 1 }, doc! { "_id": 2 }];

        let result = store.insert_many(&blocks(), documents, false).await;
        match result {
            Err(StoreError::PartialBatch { committed, .. }) => {
                assert_eq!(committed, vec![Bson::Int32(1), Bson::Int32(2)]);
            }
            other => panic!("expected partial batch, got {other:?}"),
        }
        assert_eq!(store.count(&blocks()).await, 2);
    }

    #[tokio::test]
    async fn test_update_one_without_upsert_reports_zero() {
        let store = MemoryStore::new("test_db");
        let summary = store
            .update_one(
                &blocks(),
                doc! { "id": "x" },
                doc! { "$set": { "a": 1 } },
                false,
            )
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary::default());
        assert_eq!(store.count(&blocks()).await, 0);
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_document_untouched() {
        let store = MemoryStore::new("test_db");
        store
            .insert_one(&blocks(), doc! { "_id": 1, "a": 1 })
            .await
            .unwrap();
        let result = store
            .update_one(&blocks(), doc! { "_id": 1 }, doc! { "a": 2 }, true)
            .await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));

        let stored = store
            .find_one(&blocks(), doc! { "_id": 1 })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get_i32("a").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_refuses_operations() {
        let store = MemoryStore::new("test_db");
        store.close().await.unwrap();
        store.close().await.unwrap();
        assert!(store.is_closed());
        assert!(matches!(store.ping().await, Err(StoreError::Closed)));
        assert!(matches!(
            store.insert_one(&blocks(), doc! { "a": 1 }).await,
            Err(StoreError::Closed)
        ));
    }
}
