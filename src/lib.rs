// Inserter - document store insertion utility
// Copyright (c) 2025 Inserter Contributors
// Licensed under the MIT License

//! # Inserter
//!
//! A small façade for writing schema-free documents into MongoDB. It owns
//! one store session and offers three writes: insert one document, insert
//! a batch (ordered or unordered) and upsert one document by filter.
//!
//! ## Architecture
//!
//! - [`core`] - The [`DocumentInserter`](core::DocumentInserter) façade
//! - [`adapters`] - Store backends behind the `DocumentStore` trait (MongoDB, in-memory)
//! - [`domain`] - Identifiers, outcomes and error types
//! - [`config`] - TOML configuration with environment substitution
//! - [`logging`] - Structured logging
//! - [`cli`] - The `inserter` binary's commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inserter::config::load_config;
//! use inserter::core::DocumentInserter;
//! use mongodb::bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("inserter.toml")?;
//!     let inserter = DocumentInserter::connect(&config).await?;
//!
//!     let id = inserter
//!         .insert_one("blocks", doc! { "id": "minecraft:stone", "hardness": 1.5 })
//!         .await?;
//!     println!("Inserted {id}");
//!
//!     let outcome = inserter
//!         .upsert_one(
//!             "blocks",
//!             doc! { "id": "minecraft:dirt" },
//!             doc! { "hardness": 0.5, "tool": "shovel" },
//!         )
//!         .await?;
//!     println!("Upsert: {outcome}");
//!
//!     inserter.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`domain::Result`]. Connection failures surface
//! as [`domain::InserterError::Connection`]; the library never exits the
//! process. Partially applied batches carry the committed identifiers:
//!
//! ```rust
//! use inserter::domain::{InsertError, InserterError};
//!
//! fn committed_count(err: &InserterError) -> usize {
//!     match err {
//!         InserterError::Insert(InsertError::Batch(failure)) => failure.committed.len(),
//!         _ => 0,
//!     }
//! }
//! # assert_eq!(committed_count(&InserterError::ClosedConnection), 0);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
