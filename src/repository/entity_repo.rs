// ==========================================
// Reagent Inventory - Typed collection repositories
// ==========================================
// Wraps a DocumentStore with (de)serialization for one entity type.
// Documents that do not decode are skipped on list, never fatal.
// ==========================================

use crate::domain::{Entity, Location, Professor, Reagent, StoredDocument};
use crate::repository::document_store::DocumentStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::subscription::{RawDocument, Subscription};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

pub type ReagentRepository = EntityRepository<Reagent>;
pub type ProfessorRepository = EntityRepository<Professor>;
pub type LocationRepository = EntityRepository<Location>;

pub struct EntityRepository<T: Entity> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> EntityRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn encode(record: &T) -> RepositoryResult<Value> {
        Ok(serde_json::to_value(record)?)
    }

    fn decode(doc: RawDocument) -> RepositoryResult<StoredDocument<T>> {
        let record = serde_json::from_value::<T>(doc.record).map_err(|e| {
            RepositoryError::DecodeError {
                collection: T::COLLECTION.to_string(),
                id: doc.id.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(StoredDocument::new(doc.id, record))
    }

    fn decode_all(docs: Vec<RawDocument>) -> Vec<StoredDocument<T>> {
        docs.into_iter()
            .filter_map(|doc| match Self::decode(doc) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable document");
                    None
                }
            })
            .collect()
    }

    /// Stores `record` under a new id and returns it.
    pub async fn create(&self, record: &T) -> RepositoryResult<String> {
        self.store.create(T::COLLECTION, Self::encode(record)?).await
    }

    pub async fn create_with_id(&self, id: &str, record: &T) -> RepositoryResult<()> {
        self.store
            .create_with_id(T::COLLECTION, id, Self::encode(record)?)
            .await
    }

    pub async fn get(&self, id: &str) -> RepositoryResult<Option<StoredDocument<T>>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(Self::decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> RepositoryResult<Vec<StoredDocument<T>>> {
        let docs = self.store.get_all(T::COLLECTION).await?;
        Ok(Self::decode_all(docs))
    }

    /// Matches `field` or, on older documents, its legacy spelling.
    pub async fn list_where(
        &self,
        field: &str,
        value: &Value,
    ) -> RepositoryResult<Vec<StoredDocument<T>>> {
        let mut fields = vec![field];
        fields.extend(T::legacy_keys(field));
        let docs = self
            .store
            .get_where_any(T::COLLECTION, &fields, value)
            .await?;
        Ok(Self::decode_all(docs))
    }

    /// Overwrites every field of an existing record. Legacy keys, and
    /// stored keys the record no longer serializes, are dropped.
    pub async fn update(&self, id: &str, record: &T) -> RepositoryResult<()> {
        let body = Self::encode(record)?;
        let mut remove: Vec<&str> = Vec::new();
        for &(canonical, legacy) in T::FIELD_ALIASES {
            remove.push(legacy);
            if body.get(canonical).is_none() {
                remove.push(canonical);
            }
        }
        self.store
            .update_removing(T::COLLECTION, id, body, &remove)
            .await
    }

    /// Merges only the given top-level fields. A written field replaces
    /// its legacy spelling.
    pub async fn update_fields(&self, id: &str, partial: Value) -> RepositoryResult<()> {
        let remove: Vec<&str> = match &partial {
            Value::Object(map) => map
                .keys()
                .flat_map(|key| T::legacy_keys(key))
                .collect(),
            _ => Vec::new(),
        };
        self.store
            .update_removing(T::COLLECTION, id, partial, &remove)
            .await
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.store.delete(T::COLLECTION, id).await
    }

    /// All-or-nothing create.
    pub async fn batch_create(&self, records: &[T]) -> RepositoryResult<Vec<String>> {
        let bodies = records
            .iter()
            .map(Self::encode)
            .collect::<RepositoryResult<Vec<_>>>()?;
        self.store.atomic_batch_create(T::COLLECTION, bodies).await
    }

    pub async fn subscribe(&self) -> RepositoryResult<Subscription<T>> {
        Ok(self.store.subscribe(T::COLLECTION).await?.retype())
    }
}

impl EntityRepository<Reagent> {
    /// Reagents stored at `location_id`.
    pub async fn list_by_location(
        &self,
        location_id: &str,
    ) -> RepositoryResult<Vec<StoredDocument<Reagent>>> {
        self.list_where("locationId", &Value::String(location_id.to_string()))
            .await
    }
}
