//! Convenient re-exports of commonly used types from vellum.
//!
//! ```ignore
//! use vellum::prelude::*;
//! ```

pub use vellum_core::{
    backend::{DiskBackend, FileBackend, PathKind},
    collection::{Collection, CollectionMeta},
    database::{Database, DatabaseMeta},
    document::Document,
    error::{StoreError, StoreResult},
    query::{Criterion, MatchOp},
};
