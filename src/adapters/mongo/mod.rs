//! MongoDB integration
//!
//! This module provides the MongoDB backend for the document store
//! abstraction.

pub mod client;
mod errors;

pub use client::MongoStore;
