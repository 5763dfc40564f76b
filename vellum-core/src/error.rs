//! Error types and result types for store operations.
//!
//! Every fallible operation in the crate returns [`StoreResult<T>`]. Failures
//! are always explicit: no operation signals an error condition through a
//! sentinel value.

use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

/// Represents all possible errors raised by the document store.
///
/// The first six variants are the caller-visible failure kinds of the data
/// engine; `Io` and `Serialization` wrap failures of the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A collection with the given name already exists in the database.
    #[error("can't create collection with name `{0}`, another collection exists with the same name")]
    DuplicateCollection(String),
    /// The requested collection does not exist in the database.
    #[error("collection with name `{0}` not found")]
    CollectionNotFound(String),
    /// No document in the collection carries the given identifier.
    #[error("document with id `{0}` not found")]
    DocumentNotFound(String),
    /// An attempt to set a system-reserved or immutable key outside the
    /// import path.
    #[error("can't set property with key `{0}`, it's reserved for the system")]
    ReservedKey(String),
    /// A read of a key that is absent from the document.
    #[error("property with key `{0}` not found")]
    PropertyNotFound(String),
    /// Persisted data failed schema validation during restore.
    #[error("corrupt persisted data: {0}")]
    CorruptData(String),
    /// An error surfaced by the file-system backend.
    #[error(transparent)]
    Io(#[from] IoError),
    /// Serialization error while encoding the store to JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
