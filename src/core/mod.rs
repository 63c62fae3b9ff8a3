//! Core business logic for Inserter.
//!
//! - [`inserter`] - The insertion façade ([`DocumentInserter`])

pub mod inserter;

pub use inserter::DocumentInserter;
