//! Domain models and types for Inserter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CollectionName`], [`DocumentId`])
//! - **Collection references** ([`CollectionRef`])
//! - **Outcomes** ([`UpsertOutcome`], [`UpdateSummary`])
//! - **Error types** ([`InserterError`], [`InsertError`], [`UpsertError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! Documents are [`bson::Document`](mongodb::bson::Document) values: ordered
//! maps of string keys to nested values with no fixed schema. The façade
//! forwards them to the store untouched.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, InserterError>`]:
//!
//! ```rust
//! use inserter::domain::{InserterError, InsertError, Result};
//!
//! fn classify(result: Result<()>) -> &'static str {
//!     match result {
//!         Ok(()) => "ok",
//!         Err(InserterError::Insert(InsertError::DuplicateKey(_))) => "duplicate",
//!         Err(InserterError::ClosedConnection) => "closed",
//!         Err(_) => "other",
//!     }
//! }
//! # assert_eq!(classify(Ok(())), "ok");
//! ```

pub mod collection;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use collection::CollectionRef;
pub use errors::{
    BatchInsertFailure, BatchWriteFailure, InsertError, InserterError, StoreError, UpsertError,
};
pub use ids::{CollectionName, DocumentId};
pub use outcome::{UpdateSummary, UpsertOutcome};
pub use result::Result;

/// Schema-free document exchanged with the store
pub type Document = mongodb::bson::Document;
