//! Persistence codec: the JSON document-array format.
//!
//! One direction serializes the database's collections into an array of
//! `{ "name": ..., "data": [...] }` entries; the other direction validates
//! untrusted input against that shape before reconstructing any state.
//! Reconstruction replays each record through
//! [`Collection::import_document`], so identifiers and timestamps assigned
//! in an earlier session survive the round-trip exactly.

use chrono::DateTime;
use serde_json::{json, Map, Value};

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};

/// Serializes collections into the persisted document-array format.
///
/// The outer array and each `data` array are in insertion order.
pub fn encode(collections: &[Collection]) -> Value {
    let entries: Vec<Value> = collections
        .iter()
        .map(|collection| {
            let data: Vec<Value> = collection
                .documents()
                .iter()
                .map(|doc| Value::Object(doc.object().clone()))
                .collect();

            json!({
                "name": collection.name(),
                "data": data,
            })
        })
        .collect();

    Value::Array(entries)
}

/// Validates a parsed JSON value against the persisted format and rebuilds
/// detached collections from it.
///
/// Every entry and every document is checked before any collection is
/// returned, so a failure never yields partial state.
///
/// # Errors
///
/// Returns [`StoreError::CorruptData`] naming the offending entry if the
/// top-level shape, or any document's required fields or types, do not
/// match the schema.
pub fn decode(value: &Value) -> StoreResult<Vec<Collection>> {
    let entries = value.as_array().ok_or_else(|| {
        StoreError::CorruptData("top-level value is not an array of collection entries".to_string())
    })?;

    let mut collections = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let entry = entry.as_object().ok_or_else(|| {
            StoreError::CorruptData(format!("entry {index} is not an object"))
        })?;

        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::CorruptData(format!("entry {index} is missing a string `name`"))
            })?;

        let data = entry
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                StoreError::CorruptData(format!(
                    "collection `{name}` (entry {index}) is missing a `data` array"
                ))
            })?;

        let mut collection = Collection::new(name);

        for (position, document) in data.iter().enumerate() {
            let record = document.as_object().ok_or_else(|| {
                StoreError::CorruptData(format!(
                    "document {position} in collection `{name}` is not an object"
                ))
            })?;

            validate_record(record, name, position)?;
            collection.import_document(record.clone());
        }

        collections.push(collection);
    }

    Ok(collections)
}

/// Checks one serialized record's required fields: `_id` must be a string or
/// a number, `_created` and `_updated` must be ISO-8601 date-time strings.
fn validate_record(record: &Map<String, Value>, name: &str, position: usize) -> StoreResult<()> {
    match record.get("_id") {
        Some(Value::String(_)) | Some(Value::Number(_)) => {}
        Some(_) => {
            return Err(StoreError::CorruptData(format!(
                "document {position} in collection `{name}` has an `_id` that is neither a string nor a number"
            )));
        }
        None => {
            return Err(StoreError::CorruptData(format!(
                "document {position} in collection `{name}` is missing `_id`"
            )));
        }
    }

    for key in ["_created", "_updated"] {
        let text = record.get(key).and_then(Value::as_str).ok_or_else(|| {
            StoreError::CorruptData(format!(
                "document {position} in collection `{name}` is missing a string `{key}`"
            ))
        })?;

        DateTime::parse_from_rfc3339(text).map_err(|_| {
            StoreError::CorruptData(format!(
                "document {position} in collection `{name}` has a `{key}` that is not a valid date-time: `{text}`"
            ))
        })?;
    }

    Ok(())
}
