// ==========================================
// Reagent Inventory - SQLite document store
// ==========================================
// Table: documents(collection, id, body JSON)
// Atomic batch create runs in a single transaction.
// Watchers get the full collection after every committed write.
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::CollectionName;
use crate::repository::document_store::DocumentStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::subscription::{snapshot_channel, RawDocument, Snapshot, Subscription};
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

// ==========================================
// SqliteDocumentStore
// ==========================================
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
    watchers: Mutex<HashMap<CollectionName, watch::Sender<Snapshot>>>,
}

impl SqliteDocumentStore {
    /// Opens (and initializes) the database at `db_path`.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Store over an already-initialized connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn ensure_object(body: &Value) -> RepositoryResult<()> {
        if body.is_object() {
            Ok(())
        } else {
            Err(RepositoryError::InvalidDocument(
                "document body must be a JSON object".to_string(),
            ))
        }
    }

    fn load_all(conn: &Connection, collection: CollectionName) -> RepositoryResult<Vec<RawDocument>> {
        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![collection.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, body) = row?;
            docs.push(RawDocument::new(id, serde_json::from_str(&body)?));
        }
        Ok(docs)
    }

    /// Pushes a fresh snapshot to watchers of `collection`, if any.
    fn notify(&self, collection: CollectionName) {
        let sender = {
            let watchers = match self.watchers.lock() {
                Ok(w) => w,
                Err(e) => {
                    tracing::error!(error = %e, "watcher registry poisoned");
                    return;
                }
            };
            match watchers.get(&collection) {
                Some(tx) if tx.receiver_count() > 0 => tx.clone(),
                _ => return,
            }
        };

        let snapshot = self
            .get_conn()
            .and_then(|conn| Self::load_all(&conn, collection));
        match snapshot {
            Ok(docs) => {
                tracing::debug!(collection = %collection, count = docs.len(), "publishing snapshot");
                sender.send_replace(Arc::new(docs));
            }
            Err(e) => tracing::error!(collection = %collection, error = %e, "snapshot reload failed"),
        }
    }
}

/// JSON scalar → SQLite value as produced by `json_extract`.
fn json_to_sql(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(SqlValue::Integer(i)),
            None => n.as_f64().map(SqlValue::Real),
        },
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        other => Some(SqlValue::Text(other.to_string())),
    }
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create_with_id(
        &self,
        collection: CollectionName,
        id: &str,
        body: Value,
    ) -> RepositoryResult<()> {
        Self::ensure_object(&body)?;
        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
                ON CONFLICT(collection, id) DO UPDATE SET body = ?3, updated_at = datetime('now')
                "#,
                params![collection.as_str(), id, serde_json::to_string(&body)?],
            )?;
        }
        self.notify(collection);
        Ok(())
    }

    async fn create(&self, collection: CollectionName, body: Value) -> RepositoryResult<String> {
        let id = Self::new_id();
        self.create_with_id(collection, &id, body).await?;
        Ok(id)
    }

    async fn get(
        &self,
        collection: CollectionName,
        id: &str,
    ) -> RepositoryResult<Option<RawDocument>> {
        let conn = self.get_conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(RawDocument::new(id, serde_json::from_str(&body)?))),
            None => Ok(None),
        }
    }

    async fn get_all(&self, collection: CollectionName) -> RepositoryResult<Vec<RawDocument>> {
        let conn = self.get_conn()?;
        Self::load_all(&conn, collection)
    }

    async fn get_where_any(
        &self,
        collection: CollectionName,
        fields: &[&str],
        value: &Value,
    ) -> RepositoryResult<Vec<RawDocument>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let mut args: Vec<SqlValue> = vec![SqlValue::Text(collection.as_str().to_string())];
        let mut extracts = Vec::with_capacity(fields.len());
        for field in fields {
            args.push(SqlValue::Text(json_path(field)));
            extracts.push(format!("json_extract(body, ?{})", args.len()));
        }

        let condition = match json_to_sql(value) {
            Some(sql_value) => {
                let key_value = if extracts.len() == 1 {
                    extracts.remove(0)
                } else {
                    format!("COALESCE({})", extracts.join(", "))
                };
                args.push(sql_value);
                format!("{} = ?{}", key_value, args.len())
            }
            None => {
                let checks: Vec<String> = (0..fields.len())
                    .map(|i| format!("json_type(body, ?{}) = 'null'", i + 2))
                    .collect();
                format!("({})", checks.join(" OR "))
            }
        };

        let sql = format!(
            "SELECT id, body FROM documents WHERE collection = ?1 AND {} ORDER BY rowid ASC",
            condition
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows: Vec<(String, String)> = stmt
            .query_map(params_from_iter(args.iter()), |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(id, body)| Ok(RawDocument::new(id, serde_json::from_str(&body)?)))
            .collect()
    }

    async fn update_removing(
        &self,
        collection: CollectionName,
        id: &str,
        partial: Value,
        remove_keys: &[&str],
    ) -> RepositoryResult<()> {
        let patch = match partial {
            Value::Object(map) => map,
            _ => {
                return Err(RepositoryError::InvalidDocument(
                    "update payload must be a JSON object".to_string(),
                ))
            }
        };

        {
            let mut conn = self.get_conn()?;
            let tx = conn.transaction()?;
            let existing: Option<String> = tx
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection.as_str(), id],
                    |row| row.get(0),
                )
                .optional()?;

            let existing = existing.ok_or_else(|| RepositoryError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

            let mut merged: Map<String, Value> = match serde_json::from_str(&existing)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            for key in remove_keys {
                merged.remove(*key);
            }
            for (key, value) in patch {
                merged.insert(key, value);
            }

            tx.execute(
                r#"
                UPDATE documents SET body = ?3, updated_at = datetime('now')
                WHERE collection = ?1 AND id = ?2
                "#,
                params![collection.as_str(), id, Value::Object(merged).to_string()],
            )?;
            tx.commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: CollectionName, id: &str) -> RepositoryResult<()> {
        {
            let conn = self.get_conn()?;
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
            )?;
        }
        self.notify(collection);
        Ok(())
    }

    async fn subscribe(&self, collection: CollectionName) -> RepositoryResult<Subscription<Value>> {
        let mut watchers = self
            .watchers
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let rx = match watchers.get(&collection) {
            Some(tx) => {
                // Refresh: the channel may hold a stale snapshot if it had no receivers.
                let docs = {
                    let conn = self.get_conn()?;
                    Self::load_all(&conn, collection)?
                };
                tx.send_replace(Arc::new(docs));
                tx.subscribe()
            }
            None => {
                let docs = {
                    let conn = self.get_conn()?;
                    Self::load_all(&conn, collection)?
                };
                let tx = snapshot_channel(docs);
                let rx = tx.subscribe();
                watchers.insert(collection, tx);
                rx
            }
        };

        tracing::debug!(collection = %collection, "subscription opened");
        Ok(Subscription::new(rx))
    }

    async fn atomic_batch_create(
        &self,
        collection: CollectionName,
        bodies: Vec<Value>,
    ) -> RepositoryResult<Vec<String>> {
        for body in &bodies {
            Self::ensure_object(body)?;
        }

        let ids = {
            let mut conn = self.get_conn()?;
            let tx = conn
                .transaction()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

            let mut ids = Vec::with_capacity(bodies.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                )?;
                for body in &bodies {
                    let id = Self::new_id();
                    stmt.execute(params![collection.as_str(), id, serde_json::to_string(body)?])?;
                    ids.push(id);
                }
            }

            tx.commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
            ids
        };

        tracing::info!(collection = %collection, count = ids.len(), "batch committed");
        self.notify(collection);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let id = store
            .create(CollectionName::Locations, json!({ "name": "204", "img": "" }))
            .await
            .unwrap();

        let doc = store.get(CollectionName::Locations, &id).await.unwrap().unwrap();
        assert_eq!(doc.record["name"], "204");

        store
            .update(CollectionName::Locations, &id, json!({ "img": "http://x/y.png" }))
            .await
            .unwrap();
        let doc = store.get(CollectionName::Locations, &id).await.unwrap().unwrap();
        assert_eq!(doc.record["name"], "204");
        assert_eq!(doc.record["img"], "http://x/y.png");

        store.delete(CollectionName::Locations, &id).await.unwrap();
        assert!(store.get(CollectionName::Locations, &id).await.unwrap().is_none());
        store.delete(CollectionName::Locations, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let err = store
            .update(CollectionName::Reagents, "nope", json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_where_equality() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        store
            .create(CollectionName::Reagents, json!({ "name": "A", "locationId": "l1" }))
            .await
            .unwrap();
        store
            .create(CollectionName::Reagents, json!({ "name": "B", "locationId": "l2" }))
            .await
            .unwrap();
        store
            .create(CollectionName::Reagents, json!({ "name": "C", "quantityValue": 3 }))
            .await
            .unwrap();

        let hits = store
            .get_where(CollectionName::Reagents, "locationId", &json!("l1"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record["name"], "A");

        let hits = store
            .get_where(CollectionName::Reagents, "quantityValue", &json!(3))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record["name"], "C");
    }

    #[tokio::test]
    async fn test_get_where_any_prefers_first_present_key() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        store
            .create(CollectionName::Reagents, json!({ "name": "A", "lugarId": "l1" }))
            .await
            .unwrap();
        store
            .create(CollectionName::Reagents, json!({ "name": "B", "locationId": "l1" }))
            .await
            .unwrap();
        store
            .create(
                CollectionName::Reagents,
                json!({ "name": "C", "locationId": "l2", "lugarId": "l1" }),
            )
            .await
            .unwrap();

        let hits = store
            .get_where_any(CollectionName::Reagents, &["locationId", "lugarId"], &json!("l1"))
            .await
            .unwrap();
        let names: Vec<_> = hits.iter().map(|d| d.record["name"].clone()).collect();
        assert_eq!(names, vec![json!("A"), json!("B")]);

        assert!(store
            .get_where_any(CollectionName::Reagents, &[], &json!("l1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_removing_drops_keys_in_same_write() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let id = store
            .create(
                CollectionName::Reagents,
                json!({ "nombre": "Acetona", "lugarId": "l1", "marca": "Merck" }),
            )
            .await
            .unwrap();

        store
            .update_removing(
                CollectionName::Reagents,
                &id,
                json!({ "name": "Acetona", "locationId": "l1" }),
                &["nombre", "lugarId"],
            )
            .await
            .unwrap();
        let doc = store.get(CollectionName::Reagents, &id).await.unwrap().unwrap();
        assert_eq!(
            doc.record,
            json!({ "name": "Acetona", "locationId": "l1", "marca": "Merck" })
        );
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        store
            .create_with_id(CollectionName::Locations, "same", json!({ "name": "L" }))
            .await
            .unwrap();
        store
            .create_with_id(CollectionName::Professors, "same", json!({ "firstName": "P" }))
            .await
            .unwrap();

        assert_eq!(store.get_all(CollectionName::Locations).await.unwrap().len(), 1);
        assert_eq!(store.get_all(CollectionName::Professors).await.unwrap().len(), 1);
        assert!(store.get_all(CollectionName::Reagents).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_rejects_non_object_without_writing() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let result = store
            .atomic_batch_create(
                CollectionName::Reagents,
                vec![json!({ "name": "ok" }), json!("not an object")],
            )
            .await;
        assert!(result.is_err());
        assert!(store.get_all(CollectionName::Reagents).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_receives_snapshots() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let mut sub = store.subscribe(CollectionName::Locations).await.unwrap();

        let initial = sub.next().await.unwrap();
        assert!(initial.is_empty());

        store
            .create(CollectionName::Locations, json!({ "name": "Lab 1" }))
            .await
            .unwrap();
        let after = sub.next().await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].record["name"], "Lab 1");
    }
}
