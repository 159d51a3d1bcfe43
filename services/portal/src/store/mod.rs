//! Document store contract shared by the mock and remote backends.
//!
//! # Purpose
//! The gateway talks to a collection-oriented document store through
//! [`DocumentStore`]. Two implementations exist: [`memory::InMemoryStore`]
//! (mock mode and tests) and [`postgres::PostgresStore`] (remote mode).
//!
//! # Key invariants
//! - `update` merges top-level fields; fields absent from the patch are kept.
//! - `update` and `delete` report [`StoreError::NotFound`] for unknown ids.
//! - Backends never interpret document bodies beyond the top-level merge.
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub mod memory;
pub mod postgres;
#[cfg(all(test, feature = "pg-tests"))]
mod postgres_tests;

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Communities,
    Residents,
    Vendors,
    Repairs,
    Meetings,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Communities,
        Collection::Residents,
        Collection::Vendors,
        Collection::Repairs,
        Collection::Meetings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Communities => "communities",
            Collection::Residents => "residents",
            Collection::Vendors => "vendors",
            Collection::Repairs => "repairs",
            Collection::Meetings => "meetings",
        }
    }

    /// Prefix of identifiers synthesized in mock mode.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Communities => "C",
            Collection::Residents => "R",
            Collection::Vendors => "V",
            Collection::Repairs => "RP",
            Collection::Meetings => "M",
        }
    }

    /// Singular noun used in operation labels and error messages.
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Communities => "community",
            Collection::Residents => "resident",
            Collection::Vendors => "vendor",
            Collection::Repairs => "repair",
            Collection::Meetings => "meeting",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document: identifier plus its top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;
    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;
    /// Store a new document and return the identifier the backend assigned.
    async fn create(&self, collection: Collection, fields: Map<String, Value>)
    -> StoreResult<String>;
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<()>;
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

static LAST_ID_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Millisecond stamp for synthesized identifiers, strictly increasing per process.
///
/// Two calls within the same millisecond get consecutive values, so ids built
/// from it never repeat inside one process.
pub fn next_id_millis() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default();
    let mut last = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ID_MILLIS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

/// `<prefix><millis>` identifier, e.g. `RP1718000000000`.
pub fn synthesize_id(prefix: &str) -> String {
    format!("{prefix}{}", next_id_millis())
}
