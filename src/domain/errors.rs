//! Domain error types
//!
//! This module defines the error hierarchy for Inserter. The public taxonomy
//! ([`InserterError`], [`InsertError`], [`UpsertError`]) never exposes driver
//! types; store adapters report [`StoreError`] and the façade translates it.

use crate::domain::ids::DocumentId;
use thiserror::Error;

/// Main Inserter error type
///
/// Every fallible façade operation returns this type. Callers branch on the
/// variant instead of parsing log output.
#[derive(Debug, Error)]
pub enum InserterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The store session could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// Insert-one or insert-many failed
    #[error("Insert error: {0}")]
    Insert(#[from] InsertError),

    /// Upsert-one failed
    #[error("Upsert error: {0}")]
    Upsert(#[from] UpsertError),

    /// An operation was attempted after `close()`
    #[error("Connection is closed")]
    ClosedConnection,

    /// Caller input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Insert-specific errors
#[derive(Debug, Error)]
pub enum InsertError {
    /// A document with the same `_id` (or unique index key) already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The store refused the document
    #[error("Document rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A batch insert committed only part of its documents
    #[error("{0}")]
    Batch(BatchInsertFailure),
}

/// Upsert-specific errors
#[derive(Debug, Error)]
pub enum UpsertError {
    /// The store refused the filter or update
    #[error("Update rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store reported neither an insertion nor a matched document
    #[error("Upsert neither inserted nor matched a document (matched {matched})")]
    Inconsistent { matched: u64 },
}

/// Outcome of a batch insert that did not commit every document
///
/// Documents listed in `committed` are persisted and are not rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInsertFailure {
    /// Identifiers of the documents that were committed, in input order
    pub committed: Vec<DocumentId>,

    /// Number of documents submitted
    pub attempted: usize,

    /// Whether the batch stopped at the first failure
    pub ordered: bool,

    /// Per-document failures
    pub failures: Vec<BatchWriteFailure>,
}

impl BatchInsertFailure {
    /// Number of documents neither committed nor reported as failed
    ///
    /// Non-zero only for ordered batches, where the store stops at the first
    /// failure and never attempts the rest.
    pub fn skipped(&self) -> usize {
        self.attempted
            .saturating_sub(self.committed.len())
            .saturating_sub(self.failures.len())
    }
}

impl std::fmt::Display for BatchInsertFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Batch insert failed: {}/{} documents committed",
            self.committed.len(),
            self.attempted
        )?;
        if let Some(first) = self.failures.first() {
            write!(f, " (first failure at index {}: {})", first.index, first.message)?;
        }
        Ok(())
    }
}

/// Details of one failed document in a batch insert
#[derive(Debug, Clone, PartialEq)]
pub struct BatchWriteFailure {
    /// Position of the document in the submitted batch
    pub index: usize,

    /// Store-provided error message
    pub message: String,

    /// Whether the failure was a duplicate key violation
    pub duplicate_key: bool,
}

/// Errors reported by a [`DocumentStore`](crate::adapters::store::DocumentStore)
///
/// Adapters map their driver errors onto this enum so the façade never sees
/// driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key violation
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The store refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Network, server selection or session failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A batch insert wrote only some of its documents
    #[error("Partial batch: {} committed, {} failed", .committed.len(), .failures.len())]
    PartialBatch {
        /// Store identifiers of committed documents, in input order
        committed: Vec<mongodb::bson::Bson>,
        /// Per-document failures
        failures: Vec<BatchWriteFailure>,
    },

    /// The session has been closed
    #[error("Session closed")]
    Closed,
}

// Conversion from std::io::Error
impl From<std::io::Error> for InserterError {
    fn from(err: std::io::Error) -> Self {
        InserterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for InserterError {
    fn from(err: serde_json::Error) -> Self {
        InserterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for InserterError {
    fn from(err: toml::de::Error) -> Self {
        InserterError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from BSON serialization errors
impl From<mongodb::bson::ser::Error> for InserterError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        InserterError::Serialization(err.to_string())
    }
}
