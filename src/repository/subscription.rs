// ==========================================
// Reagent Inventory - Live collection subscriptions
// ==========================================
// Each change re-delivers the full current snapshot of a collection.
// Only the latest snapshot matters: intermediate ones may be skipped.
// ==========================================

use crate::domain::StoredDocument;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Untyped document as held by the store.
pub type RawDocument = StoredDocument<Value>;

/// Shared snapshot of one collection.
pub type Snapshot = Arc<Vec<RawDocument>>;

pub(crate) fn snapshot_channel(initial: Vec<RawDocument>) -> watch::Sender<Snapshot> {
    let (tx, _rx) = watch::channel(Arc::new(initial));
    tx
}

// ==========================================
// Subscription<T>
// ==========================================
/// Cancellable stream of full-state snapshots. Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: watch::Receiver<Snapshot>,
    delivered_initial: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self {
            rx,
            delivered_initial: false,
            _marker: PhantomData,
        }
    }

    /// First call yields the current snapshot immediately; later calls wait
    /// for the next change. `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<StoredDocument<T>>> {
        if self.delivered_initial {
            self.rx.changed().await.ok()?;
        }
        self.delivered_initial = true;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(decode_snapshot(&snapshot))
    }

    /// Current snapshot without waiting.
    pub fn latest(&self) -> Vec<StoredDocument<T>> {
        let snapshot = self.rx.borrow().clone();
        decode_snapshot(&snapshot)
    }

    pub fn cancel(self) {}

    /// Same channel, decoded as another record type.
    pub fn retype<U: DeserializeOwned>(self) -> Subscription<U> {
        Subscription {
            rx: self.rx,
            delivered_initial: self.delivered_initial,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned + Send + 'static> Subscription<T> {
    /// Callback form: runs `on_change` for every snapshot until the
    /// returned handle is dropped or unsubscribed.
    pub fn on_change<F>(mut self, mut on_change: F) -> ListenerHandle
    where
        F: FnMut(Vec<StoredDocument<T>>) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            while let Some(docs) = self.next().await {
                on_change(docs);
            }
        });
        ListenerHandle::from_task(handle)
    }
}

fn decode_snapshot<T: DeserializeOwned>(snapshot: &[RawDocument]) -> Vec<StoredDocument<T>> {
    snapshot
        .iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc.record.clone()) {
            Ok(record) => Some(StoredDocument::new(doc.id.clone(), record)),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "skipping undecodable document in snapshot");
                None
            }
        })
        .collect()
}

// ==========================================
// ListenerHandle
// ==========================================
/// Unsubscribe handle for callback listeners.
pub struct ListenerHandle {
    handle: JoinHandle<()>,
}

impl ListenerHandle {
    pub(crate) fn from_task(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
