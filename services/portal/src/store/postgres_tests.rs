//! Postgres store tests against a real database.
//!
//! # How to use
//! Set `HOA_TEST_DATABASE_URL` (or `DATABASE_URL`) and run
//! `cargo test -p portal --features pg-tests`. Without a URL every test returns early.
use super::postgres::PostgresStore;
use super::{Collection, DocumentStore, StoreError};
use crate::config::PostgresConfig;
use serde_json::{Map, Value, json};
use serial_test::serial;

fn database_url() -> Option<String> {
    std::env::var("HOA_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

async fn store() -> Option<PostgresStore> {
    let url = database_url()?;
    let pg = PostgresConfig {
        url,
        max_connections: 2,
        connect_timeout_ms: 5_000,
        acquire_timeout_ms: 5_000,
    };
    let store = PostgresStore::connect(&pg).await.expect("connect");
    Some(store)
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
#[serial]
async fn postgres_document_roundtrip() {
    let Some(store) = store().await else {
        return;
    };
    store.health_check().await.expect("health");
    assert!(store.is_durable());

    let id = store
        .create(
            Collection::Vendors,
            fields(json!({ "name": "Spark Electric", "rating": 4.5, "invoices": [] })),
        )
        .await
        .expect("create");

    store
        .update(Collection::Vendors, &id, fields(json!({ "rating": 4.9 })))
        .await
        .expect("update");
    let document = store
        .get_by_id(Collection::Vendors, &id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(document.fields["name"], "Spark Electric");
    assert_eq!(document.fields["rating"], 4.9);

    let listed = store.get_all(Collection::Vendors).await.expect("list");
    assert!(listed.iter().any(|document| document.id == id));

    store.delete(Collection::Vendors, &id).await.expect("delete");
    let err = store
        .delete(Collection::Vendors, &id)
        .await
        .expect_err("already gone");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn postgres_update_of_missing_document_is_not_found() {
    let Some(store) = store().await else {
        return;
    };
    let err = store
        .update(Collection::Residents, "missing", Map::new())
        .await
        .expect_err("missing");
    assert!(matches!(err, StoreError::NotFound(_)));
}
