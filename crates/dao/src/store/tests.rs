use serde_json::json;
use tempfile::tempdir;

use super::*;
use crate::{constants::DATA_DIR, DaoError};

#[tokio::test]
async fn test_open_filesystem_store_creates_data_directory() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("store");

    let store = Store::open(&StoreConfig::filesystem(&root)).await.unwrap();
    assert!(root.join(DATA_DIR).is_dir());
    assert_eq!(
        store.schemas().collections(),
        vec!["task", "todo", "user", "video"]
    );
}

#[tokio::test]
async fn test_collection_requires_a_schema() {
    let store = Store::open(&StoreConfig::memory()).await.unwrap();

    let err = store.collection("test_user").unwrap_err();
    assert!(matches!(err, DaoError::SchemaNotFound { .. }));

    let dao = store.collection_with_schema("test_user", "user").unwrap();
    assert_eq!(dao.collection(), "test_user");
    assert_eq!(dao.schema().unique_fields(), vec!["email"]);
}

#[tokio::test]
async fn test_daos_share_the_backend() {
    let store = Store::open(&StoreConfig::memory()).await.unwrap();
    let first = store.collection("user").unwrap();
    let second = store.collection("user").unwrap();

    first
        .create(json!({"firstName": "John", "lastName": "Smith", "email": "john.smith@example.com"}))
        .await
        .unwrap();
    let err = second
        .create(json!({"firstName": "Jane", "lastName": "Smith", "email": "john.smith@example.com"}))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key());
}

#[tokio::test]
async fn test_open_with_validators_dir() {
    let temp_dir = tempdir().unwrap();
    let validators = temp_dir.path().join("validators");
    tokio::fs::create_dir(&validators).await.unwrap();
    tokio::fs::write(
        validators.join("course.json"),
        r#"{"$jsonSchema": {"bsonType": "object", "required": ["code"],
            "properties": {"code": {"bsonType": "string", "uniqueItems": true}}}}"#,
    )
    .await
    .unwrap();

    let config = StoreConfig {
        root_path:      temp_dir.path().join("store"),
        validators_dir: Some(validators),
        backend:        BackendKind::Filesystem,
    };
    let store = Store::open(&config).await.unwrap();

    let courses = store.collection("course").unwrap();
    courses.create(json!({"code": "DV1600"})).await.unwrap();
    assert!(courses.create(json!({"code": 1600})).await.unwrap_err().is_write_error());
    assert!(courses.create(json!({"code": "DV1600"})).await.unwrap_err().is_duplicate_key());
}

#[tokio::test]
async fn test_user_controller_reads_user_collection() {
    let store = Store::open(&StoreConfig::memory()).await.unwrap();
    store
        .collection("user")
        .unwrap()
        .create(json!({"firstName": "Mo", "lastName": "N", "email": "mobn23@student.bth.se"}))
        .await
        .unwrap();

    let user = store
        .user_controller()
        .unwrap()
        .get_user_by_email("mobn23@student.bth.se")
        .await
        .unwrap();
    assert_eq!(user["firstName"], "Mo");
}

#[tokio::test]
async fn test_filesystem_store_persists_across_reopen() {
    let temp_dir = tempdir().unwrap();
    let config = StoreConfig::filesystem(temp_dir.path());

    let created = {
        let store = Store::open(&config).await.unwrap();
        store
            .collection("video")
            .unwrap()
            .create(json!({"url": "testurl"}))
            .await
            .unwrap()
    };

    let store = Store::open(&config).await.unwrap();
    let found = store
        .collection("video")
        .unwrap()
        .find_all(json!({"url": "testurl"}))
        .await
        .unwrap();
    assert_eq!(found, vec![created]);
}
