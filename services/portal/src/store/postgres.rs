//! Postgres-backed implementation of the document store.
//!
//! # What this module is
//! The remote-mode backend. Every collection shares one `documents` table keyed
//! by `(collection, id)` with the document body stored as JSONB.
//!
//! # Key invariants
//! - Identifiers are assigned by Postgres (`gen_random_uuid()`), never by callers.
//! - Partial updates use the JSONB concatenation operator, so only top-level
//!   fields named in the patch are replaced.
//! - Listings are returned in creation order.
//!
//! # Security notes
//! - Database URLs may contain credentials; avoid logging them.
//! - All statements are static and parameterized.
//!
//! # Operational notes
//! Migrations are embedded with `sqlx::migrate!("./migrations")` and run on
//! connect, so the gateway can assume the schema exists.
use super::{Collection, Document, DocumentStore, StoreError, StoreResult};
use crate::config::PostgresConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Durable document store backed by Postgres.
///
/// # Example
/// ```rust,no_run
/// use portal::config::PostgresConfig;
/// use portal::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct DbDocument {
    id: String,
    body: Value,
}

impl PostgresStore {
    /// Connect to Postgres and apply embedded migrations.
    ///
    /// # Errors
    /// - Invalid URL, connection failure or timeout, or migration failure.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let store = Self::connect_without_migrations(pg).await?;
        sqlx::migrate!("./migrations").run(&store.pool).await?;
        Ok(store)
    }

    /// Connect without running migrations, for schemas managed elsewhere.
    pub async fn connect_without_migrations(pg: &PostgresConfig) -> StoreResult<Self> {
        // Avoid logging `pg.url` because it may contain credentials.
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let connect_timeout = Duration::from_millis(pg.connect_timeout_ms);
        let pool = tokio::time::timeout(
            connect_timeout,
            PgPoolOptions::new()
                .max_connections(pg.max_connections)
                .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
                .connect_with(connect_options),
        )
        .await
        .map_err(|_| anyhow!("postgres connect timed out after {connect_timeout:?}"))??;
        Ok(Self { pool })
    }

    /// Wrap an existing pool; the schema must already be migrated.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, collection: Collection) -> StoreResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Runs after the write has committed, so a failure here only leaves the gauge stale.
    async fn refresh_count(&self, collection: Collection) {
        publish_count(collection, self.count(collection).await);
    }
}

fn publish_count(collection: Collection, total: StoreResult<i64>) {
    match total {
        Ok(total) => {
            metrics::gauge!("hoa_store_documents", "collection" => collection.as_str())
                .set(total as f64);
        }
        Err(err) => warn!(
            collection = collection.as_str(),
            error = %err,
            "document count refresh failed"
        ),
    }
}

fn document_from_db(row: DbDocument) -> StoreResult<Document> {
    match row.body {
        Value::Object(fields) => Ok(Document { id: row.id, fields }),
        other => Err(StoreError::Unexpected(anyhow!(
            "document {} has a non-object body: {other}",
            row.id
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DbDocument>(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(document_from_db).collect()
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DbDocument>(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(document_from_db).transpose()
    }

    async fn create(
        &self,
        collection: Collection,
        mut fields: Map<String, Value>,
    ) -> StoreResult<String> {
        fields.remove("id");
        let id: String = sqlx::query_scalar(
            "INSERT INTO documents (collection, body) VALUES ($1, $2) RETURNING id",
        )
        .bind(collection.as_str())
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;
        metrics::counter!("hoa_store_writes_total", "op" => "created").increment(1);
        self.refresh_count(collection).await;
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        mut patch: Map<String, Value>,
    ) -> StoreResult<()> {
        patch.remove("id");
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Value::Object(patch))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("{} {id}", collection.noun())));
        }
        metrics::counter!("hoa_store_writes_total", "op" => "updated").increment(1);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("{} {id}", collection.noun())));
        }
        metrics::counter!("hoa_store_writes_total", "op" => "deleted").increment(1);
        self.refresh_count(collection).await;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
