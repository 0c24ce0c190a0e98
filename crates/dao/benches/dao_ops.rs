use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use edutask_dao::{DocumentStore, Store, StoreConfig};
use serde_json::json;
use tempfile::tempdir;

async fn setup_users() -> (DocumentStore, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let store = Store::open(&StoreConfig::filesystem(temp_dir.path()))
        .await
        .unwrap();
    let users = store.collection("user").unwrap();
    (users, temp_dir)
}

async fn seed(users: &DocumentStore, count: usize) {
    for i in 0..count {
        let user = json!({
            "firstName": "John",
            "lastName": format!("Doe{}", i),
            "email": format!("john.doe{}@example.com", i)
        });
        users.create(user).await.unwrap();
    }
}

fn bench_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("dao_create", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (users, _temp_dir) = setup_users().await;
                let user = json!({
                    "firstName": "John",
                    "lastName": "Doe",
                    "email": black_box("john.doe@example.com")
                });
                users.create(user).await.unwrap();
            });
        })
    });
}

fn bench_create_with_existing(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("dao_create_unique_check_50", |b| {
        b.iter_batched(
            || {
                rt.block_on(async {
                    let (users, temp_dir) = setup_users().await;
                    seed(&users, 50).await;
                    (users, temp_dir)
                })
            },
            |(users, _temp_dir)| {
                rt.block_on(async move {
                    let user = json!({
                        "firstName": "Jane",
                        "lastName": "Doe",
                        "email": black_box("jane.doe@example.com")
                    });
                    black_box(users.create(user).await.unwrap());
                })
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_find(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("dao_find_by_email_50", |b| {
        b.iter_batched(
            || {
                rt.block_on(async {
                    let (users, temp_dir) = setup_users().await;
                    seed(&users, 50).await;
                    (users, temp_dir)
                })
            },
            |(users, _temp_dir)| {
                rt.block_on(async move {
                    let query = json!({"email": black_box("john.doe25@example.com")});
                    black_box(users.find_all(query).await.unwrap());
                })
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_get_user_by_email(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("controller_get_user_by_email_50", |b| {
        b.iter_batched(
            || {
                rt.block_on(async {
                    let temp_dir = tempdir().unwrap();
                    let store = Store::open(&StoreConfig::filesystem(temp_dir.path()))
                        .await
                        .unwrap();
                    seed(&store.collection("user").unwrap(), 50).await;
                    (store.user_controller().unwrap(), temp_dir)
                })
            },
            |(controller, _temp_dir)| {
                rt.block_on(async move {
                    black_box(
                        controller
                            .get_user_by_email(black_box("john.doe25@example.com"))
                            .await
                            .unwrap(),
                    );
                })
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_create_with_existing,
    bench_find,
    bench_get_user_by_email
);
criterion_main!(benches);
