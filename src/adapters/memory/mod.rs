//! In-memory document store
//!
//! Backend used for dry runs and tests. Nothing is persisted beyond the
//! life of the process.

mod matcher;
pub mod store;

pub use store::MemoryStore;
