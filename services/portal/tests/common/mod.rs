#![allow(dead_code)]

use async_trait::async_trait;
use portal::store::memory::InMemoryStore;
use portal::store::{Collection, Document, DocumentStore, StoreError, StoreResult};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a [`ScriptedStore`] misbehaves.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Reads never resolve.
    pub hang_reads: bool,
    /// Writes never resolve.
    pub hang_writes: bool,
    /// Reads resolve only after this delay.
    pub read_delay: Option<Duration>,
    /// Reject reads of these collections with this message.
    pub fail_reads: Option<(Vec<Collection>, String)>,
    /// Reject every write with this message.
    pub fail_writes: Option<String>,
    /// Identifier handed out by the next create.
    pub next_id: Option<String>,
}

/// Remote-store double over an in-memory store, counting calls.
pub struct ScriptedStore {
    inner: InMemoryStore,
    script: Mutex<Script>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(inner: InMemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            script: Mutex::new(Script::default()),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        })
    }

    pub fn seeded() -> Arc<Self> {
        Self::new(InMemoryStore::seeded())
    }

    pub fn script(&self, update: impl FnOnce(&mut Script)) {
        update(&mut self.script.lock().expect("script lock"));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    fn current(&self) -> Script {
        self.script.lock().expect("script lock").clone()
    }

    async fn before_read(&self, collection: Collection) -> StoreResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let script = self.current();
        if script.hang_reads {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = script.read_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((collections, message)) = script.fail_reads {
            if collections.contains(&collection) {
                return Err(StoreError::Unexpected(anyhow::anyhow!(message)));
            }
        }
        Ok(())
    }

    async fn before_write(&self) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let script = self.current();
        if script.hang_writes {
            std::future::pending::<()>().await;
        }
        if let Some(message) = script.fail_writes {
            return Err(StoreError::Unexpected(anyhow::anyhow!(message)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.before_read(collection).await?;
        self.inner.get_all(collection).await
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.before_read(collection).await?;
        self.inner.get_by_id(collection, id).await
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> StoreResult<String> {
        self.before_write().await?;
        let next_id = self.script.lock().expect("script lock").next_id.take();
        match next_id {
            Some(id) => {
                self.inner
                    .insert(
                        collection,
                        Document {
                            id: id.clone(),
                            fields,
                        },
                    )
                    .await;
                Ok(id)
            }
            None => self.inner.create(collection, fields).await,
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<()> {
        self.before_write().await?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.before_write().await?;
        self.inner.delete(collection, id).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}
