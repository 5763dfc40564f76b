//! Full-store persistence round-trips through the public surface.

use serde_json::{json, Map, Value};
use tempfile::tempdir;
use vellum::prelude::*;

fn record(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn seeded_database() -> Database {
    let mut db = Database::new();

    let first = db.collection("collection1");
    first.create_document(record(json!({ "name": "Doc1", "value": 123 }))).unwrap();
    first.create_document(record(json!({ "name": "Doc2", "value": 456 }))).unwrap();

    let second = db.collection("collection2");
    second.create_document(record(json!({ "name": "DocA", "value": "abc" }))).unwrap();

    db
}

#[tokio::test]
async fn round_trip_preserves_collections_and_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    let db = seeded_database();
    db.persist(&path).await.unwrap();

    let mut restored = Database::new();
    restored.restore(&path).await.unwrap();

    assert_eq!(restored.collection_names(), vec!["collection1", "collection2"]);

    for name in ["collection1", "collection2"] {
        let original = db.get_collection(name).unwrap();
        let copy = restored.get_collection(name).unwrap();

        assert_eq!(copy.len(), original.len());

        // Field sets survive exactly, `_id`/`_created`/`_updated` included.
        for (a, b) in original.documents().iter().zip(copy.documents()) {
            assert_eq!(a.object(), b.object());
        }
    }
}

#[tokio::test]
async fn repeated_cycles_are_idempotent() {
    let dir = tempdir().unwrap();
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");

    let db = seeded_database();
    db.persist(&first_path).await.unwrap();

    let mut copy = Database::new();
    copy.restore(&first_path).await.unwrap();
    copy.persist(&second_path).await.unwrap();

    let first: Value =
        serde_json::from_str(&std::fs::read_to_string(&first_path).unwrap()).unwrap();
    let second: Value =
        serde_json::from_str(&std::fs::read_to_string(&second_path).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn persisted_file_has_the_documented_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    seeded_database().persist(&path).await.unwrap();

    let data: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entries = data.as_array().unwrap();

    assert_eq!(entries[0]["name"], json!("collection1"));
    assert_eq!(entries[1]["name"], json!("collection2"));

    let docs = entries[0]["data"].as_array().unwrap();
    assert_eq!(docs[0]["_id"], json!(0));
    assert_eq!(docs[0]["name"], json!("Doc1"));
    assert_eq!(docs[1]["_id"], json!(1));
    assert!(docs[0]["_created"].is_string());
    assert!(docs[0]["_updated"].is_string());
}

#[tokio::test]
async fn persist_overwrites_an_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    std::fs::write(&path, "stale contents").unwrap();

    let db = seeded_database();
    db.persist(&path).await.unwrap();

    let data: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(data.is_array());
}

#[tokio::test]
async fn persist_refuses_a_directory_path() {
    let dir = tempdir().unwrap();

    let result = seeded_database().persist(dir.path()).await;

    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[tokio::test]
async fn restore_surfaces_a_missing_file() {
    let dir = tempdir().unwrap();

    let mut db = Database::new();
    let result = db.restore(dir.path().join("absent.json")).await;

    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[tokio::test]
async fn restore_rejects_invalid_json_and_leaves_the_database_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut db = Database::new();
    let result = db.restore(&path).await;

    assert!(matches!(result, Err(StoreError::CorruptData(_))));
    assert!(db.collection_names().is_empty());
}

#[tokio::test]
async fn restore_rejects_schema_violations_and_leaves_the_database_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("invalid.json");

    // Second entry's document is missing its timestamps.
    let payload = json!([
        {
            "name": "good",
            "data": [{
                "_id": 0,
                "_created": "2024-01-01T00:00:00.000Z",
                "_updated": "2024-01-01T00:00:00.000Z",
            }],
        },
        { "name": "bad", "data": [{ "_id": 1 }] },
    ]);
    std::fs::write(&path, payload.to_string()).unwrap();

    let mut db = Database::new();
    let result = db.restore(&path).await;

    assert!(matches!(result, Err(StoreError::CorruptData(_))));
    // Validation failed mid-file, so not even the valid entry is attached.
    assert!(db.collection_names().is_empty());
}

#[tokio::test]
async fn restore_rejects_a_collection_name_clash_without_partial_attachment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    seeded_database().persist(&path).await.unwrap();

    let mut db = Database::new();
    db.create_collection("collection2").unwrap();

    let result = db.restore(&path).await;

    assert!(matches!(
        result,
        Err(StoreError::DuplicateCollection(name)) if name == "collection2"
    ));
    // The clash was detected before anything was attached.
    assert_eq!(db.collection_names(), vec!["collection2"]);
}

#[tokio::test]
async fn restored_timestamps_are_preserved_not_regenerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    let payload = json!([{
        "name": "archive",
        "data": [{
            "_id": "abc",
            "_created": "2019-06-01T08:30:00.000Z",
            "_updated": "2019-06-02T09:45:00.000Z",
            "label": "old",
        }],
    }]);
    std::fs::write(&path, payload.to_string()).unwrap();

    let mut db = Database::new();
    db.restore(&path).await.unwrap();

    let doc = db.get_collection("archive").unwrap().get_by_id("abc").unwrap();

    assert_eq!(
        doc.get_property("_created").unwrap(),
        &json!("2019-06-01T08:30:00.000Z")
    );
    assert_eq!(
        doc.get_property("_updated").unwrap(),
        &json!("2019-06-02T09:45:00.000Z")
    );
}

#[tokio::test]
async fn end_to_end_scenario() {
    let mut db = Database::new();

    let users = db.collection("users");

    let alice = users.create_document(record(json!({ "name": "Alice" }))).unwrap();
    assert_eq!(alice.id(), &json!(0));

    let bob = users.create_document(record(json!({ "name": "Bob" }))).unwrap();
    assert_eq!(bob.id(), &json!(1));

    assert!(users.remove_by_id(0));
    assert!(matches!(
        users.get_by_id(0),
        Err(StoreError::DocumentNotFound(_))
    ));

    let remaining = users.get_by_attribute(&[]);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get_property("name").unwrap(), &json!("Bob"));
    assert_eq!(remaining[0].id(), &json!(1));
}
