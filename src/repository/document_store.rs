// ==========================================
// Reagent Inventory - Document store boundary
// ==========================================
// Per named collection: create / read / update / delete / watch,
// plus one atomic multi-document create.
// No schema enforcement: bodies are arbitrary JSON objects.
// ==========================================

use crate::domain::CollectionName;
use crate::repository::error::RepositoryResult;
use crate::repository::subscription::{RawDocument, Subscription};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `body` under a caller-chosen id, replacing any existing document.
    async fn create_with_id(
        &self,
        collection: CollectionName,
        id: &str,
        body: Value,
    ) -> RepositoryResult<()>;

    /// Writes `body` under a fresh system-assigned id.
    async fn create(&self, collection: CollectionName, body: Value) -> RepositoryResult<String>;

    async fn get(&self, collection: CollectionName, id: &str)
        -> RepositoryResult<Option<RawDocument>>;

    /// Every document, in insertion order.
    async fn get_all(&self, collection: CollectionName) -> RepositoryResult<Vec<RawDocument>>;

    /// Documents whose top-level `field` equals `value`.
    async fn get_where(
        &self,
        collection: CollectionName,
        field: &str,
        value: &Value,
    ) -> RepositoryResult<Vec<RawDocument>> {
        self.get_where_any(collection, &[field], value).await
    }

    /// Documents where the first present key of `fields` equals `value`.
    async fn get_where_any(
        &self,
        collection: CollectionName,
        fields: &[&str],
        value: &Value,
    ) -> RepositoryResult<Vec<RawDocument>>;

    /// Merges the top-level keys of `partial` into an existing document.
    /// Fails with `NotFound` when the document does not exist.
    async fn update(
        &self,
        collection: CollectionName,
        id: &str,
        partial: Value,
    ) -> RepositoryResult<()> {
        self.update_removing(collection, id, partial, &[]).await
    }

    /// `update`, also dropping `remove_keys` from the stored document
    /// in the same write.
    async fn update_removing(
        &self,
        collection: CollectionName,
        id: &str,
        partial: Value,
        remove_keys: &[&str],
    ) -> RepositoryResult<()>;

    /// Deleting a missing document is not an error.
    async fn delete(&self, collection: CollectionName, id: &str) -> RepositoryResult<()>;

    /// Live subscription delivering the full collection on every change.
    async fn subscribe(&self, collection: CollectionName) -> RepositoryResult<Subscription<Value>>;

    /// Creates every body or none of them. Returns the assigned ids in order.
    async fn atomic_batch_create(
        &self,
        collection: CollectionName,
        bodies: Vec<Value>,
    ) -> RepositoryResult<Vec<String>>;
}
