//! End-to-end scenarios over a filesystem store, one per Edutask collection.

use edutask_dao::{DaoError, Document, DocumentStore, Store, StoreConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

async fn setup() -> (Store, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = Store::open(&StoreConfig::filesystem(temp_dir.path()))
        .await
        .unwrap();
    (store, temp_dir)
}

async fn count(dao: &DocumentStore) -> usize { dao.find_all(json!({})).await.unwrap().len() }

fn id_value(doc: &Document) -> Value { doc["_id"].clone() }

#[tokio::test]
async fn user_scratch_collection_lifecycle() {
    let (store, _temp_dir) = setup().await;
    let dao = store.collection_with_schema("test_user", "user").unwrap();

    let user = dao
        .create(json!({
            "firstName": "John",
            "lastName": "Smith",
            "email": "john.smith@example.com"
        }))
        .await
        .unwrap();
    assert!(user.id().is_some());

    let duplicate = dao
        .create(json!({
            "firstName": "John2",
            "lastName": "Smith2",
            "email": "john.smith@example.com"
        }))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, DaoError::DuplicateKey { ref field, .. } if field == "email"));

    let wrong_type = dao
        .create(json!({"firstName": "John", "lastName": "Smith", "email": 123}))
        .await
        .unwrap_err();
    assert!(matches!(wrong_type, DaoError::Write { .. }));

    let missing = dao
        .create(json!({"firstName": "John", "lastName": "Smith"}))
        .await
        .unwrap_err();
    assert!(matches!(missing, DaoError::Write { .. }));

    assert_eq!(count(&dao).await, 1);

    dao.drop().await.unwrap();
    assert_eq!(count(&dao).await, 0);
}

#[tokio::test]
async fn user_field_types() {
    let (store, _temp_dir) = setup().await;
    let users = store.collection("user").unwrap();

    let user = users
        .create(json!({"firstName": "John", "lastName": "Doe", "email": "John@example.com"}))
        .await
        .unwrap();
    assert_eq!(user["firstName"], "John");

    for (first, last, email) in [
        (json!(123), json!("Doe"), json!("123@example.com")),
        (Value::Null, json!("Doe"), json!("None@example.com")),
        (json!("John"), json!(123), json!("a@example.com")),
        (json!("John"), Value::Null, json!("b@example.com")),
        (json!("John"), json!("Doe"), json!(123)),
        (json!("John"), json!("Doe"), Value::Null),
    ] {
        let err = users
            .create(json!({"firstName": first, "lastName": last, "email": email}))
            .await
            .unwrap_err();
        assert!(err.is_write_error(), "expected write error, got {:?}", err);
    }
    assert_eq!(count(&users).await, 1);
}

#[tokio::test]
async fn user_with_task_references() {
    let (store, _temp_dir) = setup().await;
    let tasks = store.collection("task").unwrap();
    let users = store.collection("user").unwrap();

    let task = tasks
        .create(json!({"title": "Test title", "description": "Test description"}))
        .await
        .unwrap();

    let user = users
        .create(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john.doe@example.com",
            "tasks": [id_value(&task)]
        }))
        .await
        .unwrap();
    assert_eq!(user["tasks"].as_array().unwrap().len(), 1);

    let err = users
        .create(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john.doe2@example.com",
            "tasks": ["not an ObjectId"]
        }))
        .await
        .unwrap_err();
    assert!(err.is_write_error());

    // The reference round-trips through disk and can be queried on.
    let owners = users
        .find_all(json!({"tasks": id_value(&task)}))
        .await
        .unwrap();
    assert_eq!(owners, vec![user]);
}

#[tokio::test]
async fn task_with_todos_and_video() {
    let (store, _temp_dir) = setup().await;
    let todos = store.collection("todo").unwrap();
    let videos = store.collection("video").unwrap();
    let tasks = store.collection("task").unwrap();

    let todo = todos.create(json!({"description": "Test description"})).await.unwrap();
    let video = videos.create(json!({"url": "testurl"})).await.unwrap();

    let task = tasks
        .create(json!({
            "title": "Test title",
            "description": "Test description",
            "todos": [id_value(&todo)],
            "video": id_value(&video)
        }))
        .await
        .unwrap();
    assert_eq!(task["todos"].as_array().unwrap().len(), 1);
    assert!(!task["video"].is_null());

    let bad_todo = tasks
        .create(json!({
            "title": "Another Test title",
            "description": "Test description",
            "todos": ["not an ObjectId"]
        }))
        .await
        .unwrap_err();
    assert!(bad_todo.is_write_error());

    let bad_video = tasks
        .create(json!({
            "title": "Yet another Test title",
            "description": "Test description",
            "video": "invalid video"
        }))
        .await
        .unwrap_err();
    assert!(bad_video.is_write_error());

    assert_eq!(count(&tasks).await, 1);
}

#[tokio::test]
async fn todo_and_video_field_types() {
    let (store, _temp_dir) = setup().await;
    let todos = store.collection("todo").unwrap();
    let videos = store.collection("video").unwrap();

    for bad in [json!(123), Value::Null] {
        assert!(todos.create(json!({"description": bad.clone()})).await.unwrap_err().is_write_error());
        assert!(videos.create(json!({"url": bad})).await.unwrap_err().is_write_error());
    }
    assert_eq!(count(&todos).await, 0);
    assert_eq!(count(&videos).await, 0);
}

#[tokio::test]
async fn user_lookup_over_filesystem() {
    let (store, _temp_dir) = setup().await;
    let users = store.collection("user").unwrap();
    let created = users
        .create(json!({
            "firstName": "Mo",
            "lastName": "N",
            "email": "mobn23@student.bth.se"
        }))
        .await
        .unwrap();

    let controller = store.user_controller().unwrap();
    let found = controller
        .get_user_by_email("mobn23@student.bth.se")
        .await
        .unwrap();
    assert_eq!(found, created);

    assert!(matches!(
        controller.get_user_by_email("mobn23student.bth.se").await,
        Err(DaoError::InvalidEmail)
    ));
    assert!(matches!(
        controller.get_user_by_email("ghost@student.bth.se").await,
        Err(DaoError::UserNotFound { .. })
    ));
}
