//! Vellum: an embeddable, in-memory JSON document store.
//!
//! A process keeps a set of named collections, each holding schema-less
//! records addressable by identifier and queryable by attribute, with the
//! whole store serializable to and restorable from a JSON file. There is no
//! separate database process and no schema beyond reserved-key protection.
//!
//! # Quick Start
//!
//! ```ignore
//! use serde_json::json;
//! use vellum::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> StoreResult<()> {
//!     let mut db = Database::new();
//!
//!     let users = db.collection("users");
//!     users.create_document(json!({ "name": "Alice" }).as_object().cloned().unwrap())?;
//!     users.create_document(json!({ "name": "Bob" }).as_object().cloned().unwrap())?;
//!
//!     // Attribute queries: exact match plus prefix/suffix/substring
//!     // operators on the string form of the stored values.
//!     let hits = users.get_by_attribute(&[Criterion::begins_with("name", "Al")]);
//!     assert_eq!(hits.len(), 1);
//!
//!     // Identifiers are assigned from a monotonic per-collection counter
//!     // when the record carries none.
//!     let bob = users.get_by_id(1)?;
//!     assert_eq!(bob.get_property("name")?, &json!("Bob"));
//!
//!     // Persist the whole store; restore it into a fresh database later.
//!     db.persist("./db.json").await?;
//!
//!     let mut copy = Database::new();
//!     copy.restore("./db.json").await?;
//!     assert_eq!(copy.collection_names(), vec!["users"]);
//!
//!     Ok(())
//! }
//! ```

pub mod prelude;

pub use vellum_core::{backend, codec, collection, database, document, error, query};

// Re-export serde_json for convenience: records are `serde_json` maps.
pub use serde_json;
