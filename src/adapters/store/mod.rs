//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction over document stores,
//! allowing the insertion façade to work with different backends
//! (MongoDB, in-memory).

pub mod factory;
pub mod traits;

pub use factory::create_document_store;
pub use traits::{DocumentStore, StoreResult};
