//! Schema-less document records with system-managed identity and timestamps.
//!
//! A [`Document`] owns one record's key/value data as a JSON object. Three
//! keys are managed by the system: `_id` (unique within the owning
//! collection, immutable after creation), `_created` (set once) and
//! `_updated` (refreshed on every successful mutation). Callers can not set
//! the system keys through [`Document::set_property`]; the import path
//! exists so previously serialized data round-trips unchanged.

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::util;

/// The identifier key. Settable at construction, immutable afterwards.
pub const ID_KEY: &str = "_id";
/// The creation timestamp key.
pub const CREATED_KEY: &str = "_created";
/// The last-update timestamp key.
pub const UPDATED_KEY: &str = "_updated";

// _rev and _key are transport-only names, reserved but currently unused.
const RESERVED_KEYS: [&str; 4] = ["_rev", "_key", CREATED_KEY, UPDATED_KEY];
const IMMUTABLE_KEYS: [&str; 1] = [ID_KEY];

fn check_reserved(key: &str) -> StoreResult<()> {
    if RESERVED_KEYS.contains(&key) {
        return Err(StoreError::ReservedKey(key.to_string()));
    }

    Ok(())
}

fn check_immutable(key: &str) -> StoreResult<()> {
    if IMMUTABLE_KEYS.contains(&key) {
        return Err(StoreError::ReservedKey(key.to_string()));
    }

    Ok(())
}

/// One schema-less record plus its system-managed fields.
///
/// Documents are created by a [`Collection`](crate::collection::Collection)
/// in normal operation; the two factory functions here are the create and
/// import entry points that the collection delegates to.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    data: Map<String, Value>,
}

impl Document {
    /// Builds a document from caller-supplied fields.
    ///
    /// Every key in `record` is checked against the reserved-key list; an
    /// attempt to set `_created`, `_updated` or one of the transport-only
    /// reserved names fails with [`StoreError::ReservedKey`]. An explicit
    /// `_id` is allowed here, which is how collections inject their
    /// auto-increment value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedKey`] if the record names a reserved key.
    pub fn create(record: Map<String, Value>) -> StoreResult<Self> {
        for key in record.keys() {
            check_reserved(key)?;
        }

        Ok(Self::build(record))
    }

    /// Builds a document from previously serialized data.
    ///
    /// The reserved-key check is skipped so that `_id`, `_created` and
    /// `_updated` from an earlier persist are preserved exactly rather than
    /// regenerated. The persistence codec validates the record before
    /// calling this.
    pub fn import(record: Map<String, Value>) -> Self {
        Self::build(record)
    }

    /// Shared builder: fills in whichever system keys are absent.
    fn build(mut data: Map<String, Value>) -> Self {
        if !data.contains_key(ID_KEY) {
            data.insert(ID_KEY.to_string(), Value::String(util::new_document_id()));
        }

        let now = util::timestamp(util::now());

        if !data.contains_key(CREATED_KEY) {
            data.insert(CREATED_KEY.to_string(), Value::String(now.clone()));
        }

        if !data.contains_key(UPDATED_KEY) {
            data.insert(UPDATED_KEY.to_string(), Value::String(now));
        }

        Self { data }
    }

    /// Returns this document's identifier (a string or an integer value).
    pub fn id(&self) -> &Value {
        // The builder guarantees the key exists.
        &self.data[ID_KEY]
    }

    /// Returns true iff `key` is present, reserved keys included.
    pub fn has_property(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PropertyNotFound`] if the key is absent.
    pub fn get_property(&self, key: &str) -> StoreResult<&Value> {
        self.data
            .get(key)
            .ok_or_else(|| StoreError::PropertyNotFound(key.to_string()))
    }

    /// Stores `value` under `key` and refreshes `_updated`.
    ///
    /// This is the only mutation entry point; there is no bulk replace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedKey`] if `key` is `_id` (immutable) or
    /// one of the system-reserved keys.
    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) -> StoreResult<()> {
        check_reserved(key)?;
        check_immutable(key)?;

        self.data.insert(key.to_string(), value.into());
        self.data.insert(
            UPDATED_KEY.to_string(),
            Value::String(util::timestamp(util::now())),
        );

        Ok(())
    }

    /// Returns the full underlying record.
    ///
    /// The borrow is read-only; internal state can not be mutated through
    /// this view.
    pub fn object(&self) -> &Map<String, Value> {
        &self.data
    }
}
