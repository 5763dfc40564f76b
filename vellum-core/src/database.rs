//! The database: a set of uniquely named collections with aggregate
//! persistence.
//!
//! A [`Database`] owns its collections exclusively and keeps them in
//! insertion order. Attached collections propagate document-set changes to
//! the database's `updated` timestamp through a shared clock handle, so that
//! timestamp is always at least as recent as the newest mutation among the
//! collections. The whole store can be serialized to a JSON file and
//! restored from one; those are the only asynchronous operations.

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{DiskBackend, FileBackend, PathKind};
use crate::codec;
use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::util;

/// Shared handle to a database's `updated` timestamp. Attached collections
/// write through it on every document-set change.
pub(crate) type UpdateHandle = Arc<RwLock<DateTime<Utc>>>;

/// Read-only snapshot of a database's bookkeeping state.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseMeta {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// An in-memory document database.
#[derive(Debug)]
pub struct Database {
    collections: Vec<Collection>,
    created: DateTime<Utc>,
    updated: UpdateHandle,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database.
    pub fn new() -> Self {
        let time = util::now();

        Database {
            collections: Vec::new(),
            created: time,
            updated: Arc::new(RwLock::new(time)),
        }
    }

    /// Returns the collection named `name`, creating and attaching it first
    /// if it does not exist yet.
    pub fn collection(&mut self, name: &str) -> &mut Collection {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.append(Collection::new(name));
                self.collections.len() - 1
            }
        };

        &mut self.collections[index]
    }

    /// Creates, attaches and returns a new collection named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCollection`] if the name is taken.
    pub fn create_collection(&mut self, name: &str) -> StoreResult<&mut Collection> {
        if self.has_collection(name) {
            return Err(StoreError::DuplicateCollection(name.to_string()));
        }

        self.append(Collection::new(name));
        let index = self.collections.len() - 1;

        Ok(&mut self.collections[index])
    }

    /// Attaches an existing collection to this database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCollection`] if a collection with the
    /// same name is already attached.
    pub fn add_collection(&mut self, collection: Collection) -> StoreResult<()> {
        if self.has_collection(collection.name()) {
            return Err(StoreError::DuplicateCollection(collection.name().to_string()));
        }

        self.append(collection);

        Ok(())
    }

    /// Returns the collection named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] if absent.
    pub fn get_collection(&self, name: &str) -> StoreResult<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.name() == name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// Mutable variant of [`Database::get_collection`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] if absent.
    pub fn get_collection_mut(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|collection| collection.name() == name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// Returns true iff a collection named `name` is attached.
    pub fn has_collection(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes the collection named `name`.
    ///
    /// With `ignore_missing`, an absent collection is not an error and
    /// `Ok(false)` is returned instead. Successful removal refreshes the
    /// database's `updated` timestamp and returns `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] if the collection is
    /// absent and `ignore_missing` is false.
    pub fn remove_collection(&mut self, name: &str, ignore_missing: bool) -> StoreResult<bool> {
        let Some(index) = self.position(name) else {
            if ignore_missing {
                return Ok(false);
            }

            return Err(StoreError::CollectionNotFound(name.to_string()));
        };

        self.collections.remove(index);
        self.update(None);
        tracing::debug!(collection = name, "removed collection");

        Ok(true)
    }

    /// Replaces any collection stored under `name` with `collection`
    /// (upsert by name).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCollection`] if the incoming
    /// collection's own name clashes with a remaining collection.
    pub fn add_or_replace_collection(
        &mut self,
        name: &str,
        collection: Collection,
    ) -> StoreResult<()> {
        self.remove_collection(name, true)?;
        self.add_collection(collection)
    }

    /// Returns all collection names in insertion order.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections
            .iter()
            .map(|collection| collection.name().to_string())
            .collect()
    }

    /// Refreshes the database's `updated` timestamp to `time`, or to now.
    ///
    /// Attached collections invoke this implicitly on every document-set
    /// change; it may also be called directly.
    pub fn update(&self, time: Option<DateTime<Utc>>) {
        *self.updated.write() = time.unwrap_or_else(util::now);
    }

    /// Returns a snapshot of the database's bookkeeping state.
    pub fn meta(&self) -> DatabaseMeta {
        DatabaseMeta {
            created: self.created,
            updated: *self.updated.read(),
        }
    }

    /// Serializes every collection's full document set to a JSON file at
    /// `path`, replacing any pre-existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if `path` names a directory or the write
    /// fails.
    pub async fn persist(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        self.persist_with(&DiskBackend, path).await
    }

    /// [`Database::persist`] over an explicit file-system backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if `path` names a directory or the write
    /// fails.
    pub async fn persist_with<B: FileBackend>(
        &self,
        backend: &B,
        path: impl AsRef<Path>,
    ) -> StoreResult<()> {
        let path = path.as_ref();

        match backend.kind(path).await? {
            PathKind::Directory => {
                return Err(StoreError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("can't persist to `{}`: path is a directory", path.display()),
                )));
            }
            // Remove the stale file before writing the new one.
            PathKind::File => backend.remove(path).await?,
            PathKind::Missing => {}
        }

        let payload = serde_json::to_string_pretty(&codec::encode(&self.collections))?;
        backend.write_text(path, &payload).await?;

        tracing::debug!(
            path = %path.display(),
            collections = self.collections.len(),
            "persisted database"
        );

        Ok(())
    }

    /// Reads a persisted JSON file, validates it, and attaches the
    /// reconstructed collections to this database.
    ///
    /// Validation runs to completion before any state is attached: a corrupt
    /// file or a collection-name clash leaves the database unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CorruptData`] if the file fails schema
    /// validation, [`StoreError::DuplicateCollection`] on a name clash, or
    /// [`StoreError::Io`] if the read fails.
    pub async fn restore(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        self.restore_with(&DiskBackend, path).await
    }

    /// [`Database::restore`] over an explicit file-system backend.
    ///
    /// # Errors
    ///
    /// Same as [`Database::restore`].
    pub async fn restore_with<B: FileBackend>(
        &mut self,
        backend: &B,
        path: impl AsRef<Path>,
    ) -> StoreResult<()> {
        let path = path.as_ref();

        let text = backend.read_text(path).await?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|err| StoreError::CorruptData(format!("invalid JSON: {err}")))?;

        let collections = codec::decode(&value)?;

        // Reject name clashes, within the file and against the live
        // database, before attaching anything.
        let mut seen = std::collections::HashSet::new();
        for collection in &collections {
            if self.has_collection(collection.name()) || !seen.insert(collection.name().to_string())
            {
                return Err(StoreError::DuplicateCollection(collection.name().to_string()));
            }
        }

        let count = collections.len();
        for collection in collections {
            self.add_collection(collection)?;
        }

        tracing::debug!(path = %path.display(), collections = count, "restored database");

        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.collections
            .iter()
            .position(|collection| collection.name() == name)
    }

    fn append(&mut self, mut collection: Collection) {
        tracing::debug!(collection = collection.name(), "attached collection");
        collection.attach(self.updated.clone());
        self.collections.push(collection);
        self.update(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Map};

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn past() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn collection_is_get_or_create() {
        let mut db = Database::new();

        db.collection("users").create_document(Map::new()).unwrap();
        // Second call returns the same collection rather than a fresh one.
        assert_eq!(db.collection("users").len(), 1);
        assert_eq!(db.collection_names(), vec!["users"]);
    }

    #[test]
    fn create_collection_rejects_duplicates() {
        let mut db = Database::new();
        db.create_collection("users").unwrap();

        assert!(matches!(
            db.create_collection("users"),
            Err(StoreError::DuplicateCollection(name)) if name == "users"
        ));
    }

    #[test]
    fn add_collection_rejects_duplicate_name() {
        let mut db = Database::new();
        db.create_collection("users").unwrap();

        assert!(db.add_collection(Collection::new("users")).is_err());
    }

    #[test]
    fn get_collection_fails_when_absent() {
        let db = Database::new();

        assert!(matches!(
            db.get_collection("ghost"),
            Err(StoreError::CollectionNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn remove_collection_honors_ignore_flag() {
        let mut db = Database::new();
        db.create_collection("users").unwrap();

        assert!(db.remove_collection("users", false).unwrap());
        assert!(!db.remove_collection("users", true).unwrap());
        assert!(db.remove_collection("users", false).is_err());
    }

    #[test]
    fn add_or_replace_is_an_upsert() {
        let mut db = Database::new();
        db.collection("users").create_document(Map::new()).unwrap();

        let replacement = Collection::new("users");
        db.add_or_replace_collection("users", replacement).unwrap();

        assert!(db.get_collection("users").unwrap().is_empty());

        // Also works when nothing is stored under the name yet.
        db.add_or_replace_collection("logs", Collection::new("logs"))
            .unwrap();
        assert_eq!(db.collection_names(), vec!["users", "logs"]);
    }

    #[test]
    fn collection_names_preserve_insertion_order() {
        let mut db = Database::new();
        db.create_collection("b").unwrap();
        db.create_collection("a").unwrap();
        db.create_collection("c").unwrap();

        assert_eq!(db.collection_names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn update_accepts_an_explicit_time() {
        let db = Database::new();
        db.update(Some(past()));

        assert_eq!(db.meta().updated, past());
    }

    #[test]
    fn attached_collection_mutations_propagate() {
        let mut db = Database::new();
        db.create_collection("users").unwrap();

        db.update(Some(past()));
        db.collection("users")
            .create_document(record(json!({ "name": "Alice" })))
            .unwrap();

        assert!(db.meta().updated > past());
    }

    #[test]
    fn detached_collection_mutations_do_not_propagate() {
        let db = Database::new();
        db.update(Some(past()));

        let mut detached = Collection::new("scratch");
        detached.create_document(Map::new()).unwrap();

        assert_eq!(db.meta().updated, past());
    }

    #[test]
    fn rename_after_attachment_breaks_name_lookup() {
        let mut db = Database::new();
        db.create_collection("users").unwrap();

        db.get_collection_mut("users").unwrap().set_name("accounts");

        // The database index is not re-keyed.
        assert!(db.get_collection("users").is_err());
        assert!(db.get_collection("accounts").is_ok());
    }
}
