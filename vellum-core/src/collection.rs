//! Named, ordered sets of documents with auto-identifier assignment.
//!
//! A [`Collection`] owns its documents exclusively and keeps them in
//! insertion order, which is also the enumeration order for queries and
//! persistence. Collections can live detached or attached to a
//! [`Database`](crate::database::Database); when attached, every change to
//! the document set is propagated to the database's `updated` timestamp
//! through a shared handle. A detached collection simply skips that step.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::UpdateHandle;
use crate::document::{Document, ID_KEY};
use crate::error::{StoreError, StoreResult};
use crate::query::{self, Criterion};
use crate::util;

/// Read-only snapshot of a collection's bookkeeping state.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionMeta {
    pub name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub auto_id: u64,
}

/// A named, insertion-ordered set of [`Document`]s.
///
/// Identifiers are unique within a collection only by construction
/// discipline: the auto-increment counter never reissues a value, but
/// imported or directly added documents may collide, in which case lookup
/// returns the first match in insertion order.
#[derive(Debug)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    auto_id: u64,
    database: Option<UpdateHandle>,
}

impl Collection {
    /// Creates an empty, detached collection.
    pub fn new(name: impl Into<String>) -> Self {
        let time = util::now();

        Collection {
            name: name.into(),
            documents: Vec::new(),
            created: time,
            updated: time,
            auto_id: 0,
            database: None,
        }
    }

    /// Returns the collection's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the collection.
    ///
    /// Renaming is not coordinated with an owning database: the database
    /// resolves collections by their current name, so after a rename any
    /// caller still holding the old name loses lookup. Keeping names
    /// consistent is the caller's responsibility.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Associates this collection with a database's update clock.
    pub(crate) fn attach(&mut self, handle: UpdateHandle) {
        self.database = Some(handle);
    }

    /// Creates a document from caller-supplied fields and appends it.
    ///
    /// If `record` carries no `_id`, the collection's auto-increment counter
    /// is assigned and then incremented. The counter is never decremented,
    /// even on removal, so identifiers are never reused within this
    /// collection's lifetime. A record that fails validation still consumes
    /// the counter value it was offered.
    ///
    /// The returned document is a snapshot of the stored one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedKey`] if the record names a
    /// system-reserved key.
    pub fn create_document(&mut self, mut record: Map<String, Value>) -> StoreResult<Document> {
        if !record.contains_key(ID_KEY) {
            record.insert(ID_KEY.to_string(), Value::from(self.auto_id));
            self.auto_id += 1;
        }

        let document = Document::create(record)?;
        self.documents.push(document.clone());
        self.touch();

        Ok(document)
    }

    /// Imports a previously serialized record and appends it.
    ///
    /// Reserved-key checks are skipped so that identifiers and timestamps
    /// assigned in an earlier session are preserved exactly. The persistence
    /// codec validates records before routing them here.
    pub fn import_document(&mut self, record: Map<String, Value>) -> Document {
        let document = Document::import(record);
        self.documents.push(document.clone());
        self.touch();

        document
    }

    /// Appends an already-constructed document as-is.
    ///
    /// No uniqueness check is performed; a duplicate identifier is the
    /// caller's responsibility.
    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
        self.touch();
    }

    /// Returns the first document whose `_id` equals `id`.
    ///
    /// Equality is exact: a string id never matches a numeric one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if no document matches.
    pub fn get_by_id(&self, id: impl Into<Value>) -> StoreResult<&Document> {
        let id = id.into();

        self.documents
            .iter()
            .find(|doc| doc.id() == &id)
            .ok_or_else(|| StoreError::DocumentNotFound(query::coerce(&id)))
    }

    /// Mutable variant of [`Collection::get_by_id`], for property updates on
    /// a stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if no document matches.
    pub fn get_by_id_mut(&mut self, id: impl Into<Value>) -> StoreResult<&mut Document> {
        let id = id.into();

        self.documents
            .iter_mut()
            .find(|doc| doc.id() == &id)
            .ok_or_else(|| StoreError::DocumentNotFound(query::coerce(&id)))
    }

    /// Returns every document satisfying all of `criteria`.
    ///
    /// An empty criteria list returns all documents in insertion order. The
    /// collection is not mutated.
    pub fn get_by_attribute(&self, criteria: &[Criterion]) -> Vec<&Document> {
        if criteria.is_empty() {
            return self.documents.iter().collect();
        }

        self.documents
            .iter()
            .filter(|doc| criteria.iter().all(|criterion| criterion.matches(doc)))
            .collect()
    }

    /// Removes the first document whose `_id` equals `id`.
    ///
    /// Returns whether a removal occurred; the update timestamps are only
    /// refreshed on success.
    pub fn remove_by_id(&mut self, id: impl Into<Value>) -> bool {
        let id = id.into();

        let Some(index) = self.documents.iter().position(|doc| doc.id() == &id) else {
            return false;
        };

        self.documents.remove(index);
        self.touch();
        true
    }

    /// Removes every document that satisfies all of `criteria` under
    /// exact-value equality.
    ///
    /// Unlike [`Collection::get_by_attribute`], the string operators of
    /// [`MatchOp`](crate::query::MatchOp) are not honored here: a criterion
    /// only matches on native value equality. This asymmetry is intentional
    /// and part of the contract. Native equality also distinguishes JSON
    /// number representations, so a stored integer `1` does not match a
    /// criterion of `1.0` even though the string-coercing query path treats
    /// both by their decimal text. An empty criteria list removes nothing.
    ///
    /// Returns whether anything was removed.
    pub fn remove_by_attribute(&mut self, criteria: &[Criterion]) -> bool {
        if criteria.is_empty() {
            return false;
        }

        let initial_len = self.documents.len();

        self.documents.retain(|doc| {
            !criteria
                .iter()
                .all(|criterion| doc.object().get(&criterion.name) == Some(&criterion.value))
        });

        if self.documents.len() == initial_len {
            return false;
        }

        self.touch();
        true
    }

    /// Returns all documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true iff the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns a snapshot of the collection's bookkeeping state.
    pub fn meta(&self) -> CollectionMeta {
        CollectionMeta {
            name: self.name.clone(),
            created: self.created,
            updated: self.updated,
            auto_id: self.auto_id,
        }
    }

    /// Refreshes this collection's `updated` timestamp and, when attached,
    /// the owning database's.
    fn touch(&mut self) {
        let time = util::now();
        self.updated = time;

        if let Some(handle) = &self.database {
            *handle.write() = time;
        }
    }
}
