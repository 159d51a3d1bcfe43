//! In-memory implementation of the document store.
//!
//! # Purpose
//! Backs mock mode and serves as the store double in tests. Documents live in
//! per-collection vectors guarded by a `tokio::sync::RwLock`, so listing order
//! is insertion order.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost when the store is dropped.
//! - Mutations take the write lock; reads take the read lock.
//! - Identifiers are synthesized as `<prefix><millis>` (see [`super::synthesize_id`]).
use super::{Collection, Document, DocumentStore, StoreError, StoreResult, synthesize_id};
use crate::fixtures;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the fixture data set.
    pub fn seeded() -> Self {
        Self::with_documents(fixtures::seed_documents())
    }

    pub fn with_documents(documents: impl IntoIterator<Item = (Collection, Document)>) -> Self {
        let mut collections: HashMap<Collection, Vec<Document>> = HashMap::new();
        for (collection, document) in documents {
            collections.entry(collection).or_default().push(document);
        }
        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Insert a document under a known id, replacing any document with that id.
    pub async fn insert(&self, collection: Collection, document: Document) {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        match documents.iter_mut().find(|existing| existing.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

fn not_found(collection: Collection, id: &str) -> StoreError {
    StoreError::NotFound(format!("{} {id}", collection.noun()))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned())
    }

    async fn create(
        &self,
        collection: Collection,
        mut fields: Map<String, Value>,
    ) -> StoreResult<String> {
        let id = synthesize_id(collection.id_prefix());
        // The identifier lives on the document, never inside its body.
        fields.remove("id");
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| not_found(collection, id))?;
        for (key, value) in patch {
            if key != "id" {
                document.fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(&collection)
            .ok_or_else(|| not_found(collection, id))?;
        let position = documents
            .iter()
            .position(|document| document.id == id)
            .ok_or_else(|| not_found(collection, id))?;
        documents.remove(position);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
