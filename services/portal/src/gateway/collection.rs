//! One entity collection behind the gateway's shared fetch/write policy.
//!
//! # Key invariants
//! - A failed `fetch_all` leaves the cache empty and the phase `Failed`.
//! - Successful writes are mirrored into the cache without refetching:
//!   create appends, update merges, delete removes.
//! - A timed-out store call is dropped; its late result is never applied.
//! - A listed document that does not decode is skipped and counted; the rest
//!   of the collection still loads. Single-record reads fail instead.
//! - With a community scope, records outside it never enter the cache.
use super::GatewayTimeouts;
use super::error::{GatewayError, GatewayResult};
use super::status::GatewayStatus;
use crate::model::{Entity, apply_patch, from_document, to_fields};
use crate::store::{Document, DocumentStore, StoreResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

/// Lifecycle of the most recent `fetch_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn ceiling(self, timeouts: &GatewayTimeouts) -> Duration {
        match self {
            Operation::List | Operation::Get => timeouts.read,
            Operation::Create | Operation::Update | Operation::Delete => timeouts.write,
        }
    }
}

/// Store handle shared by every collection of one gateway.
#[derive(Clone)]
pub(crate) struct Backend {
    pub(crate) store: Arc<dyn DocumentStore>,
    /// `None` in mock mode: no ceiling is applied.
    pub(crate) timeouts: Option<GatewayTimeouts>,
    pub(crate) status: Arc<GatewayStatus>,
    pub(crate) scope: Option<String>,
}

struct CollectionState<E> {
    records: Vec<E>,
    phase: FetchPhase,
}

/// Cached view of one collection plus the operations that keep it current.
pub struct EntityCollection<E: Entity> {
    backend: Backend,
    state: RwLock<CollectionState<E>>,
}

impl<E: Entity> EntityCollection<E> {
    pub(crate) fn new(backend: Backend) -> Self {
        Self {
            backend,
            state: RwLock::new(CollectionState {
                records: Vec::new(),
                phase: FetchPhase::Idle,
            }),
        }
    }

    /// Load the whole collection into the cache.
    ///
    /// Never fails: on error the cache becomes empty, the phase records the
    /// error and the gateway status carries its message.
    pub async fn fetch_all(&self) -> Vec<E> {
        self.state.write().await.phase = FetchPhase::Loading;
        match self.load().await {
            Ok(records) => {
                debug!(
                    collection = E::COLLECTION.as_str(),
                    count = records.len(),
                    "fetched collection"
                );
                let mut state = self.state.write().await;
                state.records = records.clone();
                state.phase = FetchPhase::Loaded;
                self.publish_size(state.records.len());
                records
            }
            Err(err) => {
                warn!(
                    collection = E::COLLECTION.as_str(),
                    error = %err,
                    "fetch failed, showing an empty collection"
                );
                self.backend.status.record_error(&err);
                let mut state = self.state.write().await;
                state.records.clear();
                state.phase = FetchPhase::Failed(err);
                self.publish_size(0);
                Vec::new()
            }
        }
    }

    /// Read the collection without touching the cache. Errors propagate.
    pub async fn list(&self) -> GatewayResult<Vec<E>> {
        let result = self.load().await;
        self.settle(Operation::List, result)
    }

    /// Read one record from the store. The cache is left as is.
    pub async fn get(&self, id: &str) -> GatewayResult<E> {
        let result = self.read_one(id).await;
        self.settle(Operation::Get, result)
    }

    /// Create a record and append it to the cache under its assigned id.
    pub async fn create(&self, draft: &E::Draft) -> GatewayResult<E> {
        let result = self.try_create(draft).await;
        let record = self.settle(Operation::Create, result)?;
        if self.in_scope(&record) {
            let mut state = self.state.write().await;
            state.records.push(record.clone());
            self.publish_size(state.records.len());
        }
        Ok(record)
    }

    /// Write a partial update and merge it into the cached record.
    pub async fn update(&self, id: &str, patch: &E::Patch) -> GatewayResult<()> {
        let result = self.try_update(id, patch).await;
        let fields = self.settle(Operation::Update, result)?;
        let mut state = self.state.write().await;
        if let Some(cached) = state.records.iter_mut().find(|record| record.id() == id) {
            match apply_patch(cached, &fields) {
                Ok(merged) => *cached = merged,
                Err(err) => warn!(
                    collection = E::COLLECTION.as_str(),
                    id,
                    error = %err,
                    "cached record could not absorb update"
                ),
            }
        }
        Ok(())
    }

    /// Delete a record and drop it from the cache.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        let result = self
            .run(
                Operation::Delete,
                Some(id),
                self.backend.store.delete(E::COLLECTION, id),
            )
            .await;
        self.settle(Operation::Delete, result)?;
        let mut state = self.state.write().await;
        state.records.retain(|record| record.id() != id);
        self.publish_size(state.records.len());
        Ok(())
    }

    /// Snapshot of the cache.
    pub async fn records(&self) -> Vec<E> {
        self.state.read().await.records.clone()
    }

    pub async fn cached(&self, id: &str) -> Option<E> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    pub async fn phase(&self) -> FetchPhase {
        self.state.read().await.phase.clone()
    }

    async fn load(&self) -> GatewayResult<Vec<E>> {
        let documents = self
            .run(
                Operation::List,
                None,
                self.backend.store.get_all(E::COLLECTION),
            )
            .await?;
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.id.clone();
            match from_document::<E>(document) {
                Ok(record) if self.in_scope(&record) => records.push(record),
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        collection = E::COLLECTION.as_str(),
                        id = %id,
                        error = %err,
                        "skipping document that does not decode"
                    );
                    metrics::counter!(
                        "hoa_gateway_decode_failures_total",
                        "collection" => E::COLLECTION.as_str()
                    )
                    .increment(1);
                }
            }
        }
        records.sort_by(E::listing_order);
        Ok(records)
    }

    fn in_scope(&self, record: &E) -> bool {
        match self.backend.scope.as_deref() {
            Some(scope) => record.community_id() == Some(scope),
            None => true,
        }
    }

    async fn read_one(&self, id: &str) -> GatewayResult<E> {
        let document = self
            .run(
                Operation::Get,
                Some(id),
                self.backend.store.get_by_id(E::COLLECTION, id),
            )
            .await?
            .ok_or_else(|| GatewayError::not_found(E::COLLECTION, id))?;
        Ok(from_document(document)?)
    }

    async fn try_create(&self, draft: &E::Draft) -> GatewayResult<E> {
        let fields = to_fields(draft)?;
        let id = self
            .run(
                Operation::Create,
                None,
                self.backend.store.create(E::COLLECTION, fields.clone()),
            )
            .await?;
        Ok(from_document(Document { id, fields })?)
    }

    async fn try_update(
        &self,
        id: &str,
        patch: &E::Patch,
    ) -> GatewayResult<serde_json::Map<String, serde_json::Value>> {
        let fields = to_fields(patch)?;
        self.run(
            Operation::Update,
            Some(id),
            self.backend.store.update(E::COLLECTION, id, fields.clone()),
        )
        .await?;
        Ok(fields)
    }

    /// Await one store call under the operation's ceiling.
    async fn run<T, F>(&self, operation: Operation, id: Option<&str>, call: F) -> GatewayResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let _in_flight = self.backend.status.begin();
        let result = match self.backend.timeouts.as_ref() {
            Some(timeouts) => {
                let after = operation.ceiling(timeouts);
                match tokio::time::timeout(after, call).await {
                    Ok(result) => result.map_err(|err| GatewayError::from_store(E::COLLECTION, id, err)),
                    Err(_) => {
                        metrics::counter!(
                            "hoa_gateway_timeouts_total",
                            "operation" => operation.as_str()
                        )
                        .increment(1);
                        Err(GatewayError::Timeout {
                            label: self.label(operation, id),
                            after,
                        })
                    }
                }
            }
            None => call
                .await
                .map_err(|err| GatewayError::from_store(E::COLLECTION, id, err)),
        };
        let outcome = match &result {
            Ok(_) => "ok",
            Err(GatewayError::Timeout { .. }) => "timeout",
            Err(_) => "error",
        };
        metrics::counter!(
            "hoa_gateway_operations_total",
            "collection" => E::COLLECTION.as_str(),
            "operation" => operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);
        result
    }

    fn label(&self, operation: Operation, id: Option<&str>) -> String {
        match (operation, id) {
            (Operation::List, _) => format!("read {}", E::COLLECTION),
            (_, Some(id)) => format!("{} {} {id}", operation.verb(), E::COLLECTION.noun()),
            (_, None) => format!("{} {}", operation.verb(), E::COLLECTION.noun()),
        }
    }

    /// Record a failure in the gateway status and hand the result back.
    fn settle<T>(&self, operation: Operation, result: GatewayResult<T>) -> GatewayResult<T> {
        match result {
            Ok(value) => {
                debug!(
                    collection = E::COLLECTION.as_str(),
                    operation = operation.as_str(),
                    "gateway operation succeeded"
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    collection = E::COLLECTION.as_str(),
                    operation = operation.as_str(),
                    error = %err,
                    "gateway operation failed"
                );
                self.backend.status.record_error(&err);
                Err(err)
            }
        }
    }

    fn publish_size(&self, count: usize) {
        metrics::gauge!("hoa_gateway_cached_records", "collection" => E::COLLECTION.as_str())
            .set(count as f64);
    }
}
