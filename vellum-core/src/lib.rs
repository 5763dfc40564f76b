//! Core engine of vellum, an embeddable in-memory JSON document store.
//!
//! This crate provides:
//!
//! - **Documents** ([`document`]) - Schema-less records with system-managed
//!   identity and timestamps
//! - **Collections** ([`collection`]) - Named, ordered document sets with
//!   auto-identifier assignment
//! - **Databases** ([`database`]) - Uniquely named collection sets with
//!   aggregate persistence
//! - **Query criteria** ([`query`]) - Flat attribute predicates with
//!   prefix/suffix/substring operators
//! - **Persistence codec** ([`codec`]) - The validated JSON document-array
//!   file format
//! - **File backend** ([`backend`]) - The async file-system seam used by
//!   persist and restore
//! - **Error handling** ([`error`]) - The [`StoreError`](error::StoreError)
//!   kinds and result alias
//!
//! # Example
//!
//! ```ignore
//! use serde_json::{json, Map, Value};
//! use vellum_core::database::Database;
//! use vellum_core::query::Criterion;
//!
//! # async fn example() -> vellum_core::error::StoreResult<()> {
//! let mut db = Database::new();
//!
//! let users = db.collection("users");
//! users.create_document(json!({ "name": "Alice" }).as_object().cloned().unwrap())?;
//! users.create_document(json!({ "name": "Bob" }).as_object().cloned().unwrap())?;
//!
//! let hits = users.get_by_attribute(&[Criterion::begins_with("name", "Al")]);
//! assert_eq!(hits.len(), 1);
//!
//! db.persist("/tmp/db.json").await?;
//! # Ok(()) }
//! ```

#[allow(unused_extern_crates)]
extern crate self as vellum_core;

pub mod backend;
pub mod codec;
pub mod collection;
pub mod database;
pub mod document;
pub mod error;
pub mod query;

mod util;
