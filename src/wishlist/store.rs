//! Favorited products, kept in memory and mirrored to durable storage.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};

use crate::api::{envelope, ItemId, Product};
use crate::wishlist::storage::KeyValueStore;

/// Storage key of the wishlist snapshot.
pub const WISHLIST_KEY: &str = "WISHLIST_PRODUCTS";

/// Handle to the process-wide wishlist.
///
/// Cheap to clone; all clones share the same state. Every effective
/// mutation queues a full snapshot write. Writes are applied in order by
/// a single background task, so the stored snapshot converges on the
/// in-memory state. The in-memory state stays authoritative when a
/// write fails.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<RwLock<WishlistInner>>,
    writes: mpsc::UnboundedSender<WriteRequest>,
}

struct WishlistInner {
    /// Most recently added first.
    items: Vec<Product>,
    index: HashSet<ItemId>,
}

enum WriteRequest {
    Snapshot(String),
    Flush(oneshot::Sender<()>),
}

impl WishlistStore {
    /// Load the persisted snapshot and start the writer task.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty wishlist.
    /// Must be called from within a tokio runtime.
    pub async fn initialize(storage: Arc<dyn KeyValueStore>) -> Self {
        let items = load_snapshot(storage.clone()).await;
        tracing::info!(count = items.len(), "Wishlist loaded");

        let index = items.iter().map(|p| p.id.clone()).collect();
        let (writes, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage, rx));

        Self {
            inner: Arc::new(RwLock::new(WishlistInner { items, index })),
            writes,
        }
    }

    pub fn is_member(&self, id: &ItemId) -> bool {
        self.inner.read().index.contains(id)
    }

    /// Ordered copy of the wishlist, most recently added first.
    pub fn items(&self) -> Vec<Product> {
        self.inner.read().items.clone()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.inner.read().items.iter().map(|p| p.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Insert at the front. Returns `false` if the id was already present.
    pub fn add(&self, item: Product) -> bool {
        let mut inner = self.inner.write();
        if !inner.index.insert(item.id.clone()) {
            return false;
        }
        inner.items.insert(0, item);
        self.persist(&inner);
        true
    }

    /// Remove by id. Returns `false` if it was not present.
    pub fn remove(&self, id: &ItemId) -> bool {
        let mut inner = self.inner.write();
        if !inner.index.remove(id) {
            return false;
        }
        inner.items.retain(|p| &p.id != id);
        self.persist(&inner);
        true
    }

    /// Remove if present, else add at the front. Returns the new membership.
    pub fn toggle(&self, item: Product) -> bool {
        let mut inner = self.inner.write();
        let now_member = if inner.index.remove(&item.id) {
            inner.items.retain(|p| p.id != item.id);
            false
        } else {
            inner.index.insert(item.id.clone());
            inner.items.insert(0, item);
            true
        };
        self.persist(&inner);
        now_member
    }

    /// Remove everything. Returns `false` if already empty.
    pub fn clear(&self) -> bool {
        let mut inner = self.inner.write();
        if inner.items.is_empty() {
            return false;
        }
        inner.items.clear();
        inner.index.clear();
        self.persist(&inner);
        true
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writes.send(WriteRequest::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Queue a snapshot of `inner`. Called with the write lock held so
    /// snapshots are queued in mutation order.
    fn persist(&self, inner: &WishlistInner) {
        let snapshot = match serde_json::to_string(&inner.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode wishlist snapshot");
                return;
            }
        };
        if self.writes.send(WriteRequest::Snapshot(snapshot)).is_err() {
            tracing::warn!("Wishlist writer stopped; change kept in memory only");
        }
    }
}

async fn load_snapshot(storage: Arc<dyn KeyValueStore>) -> Vec<Product> {
    let raw = match tokio::task::spawn_blocking(move || storage.get(WISHLIST_KEY)).await {
        Ok(Ok(Some(raw))) => raw,
        Ok(Ok(None)) => return Vec::new(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Wishlist load failed");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Wishlist load task failed");
            return Vec::new();
        }
    };
    decode_snapshot(&raw)
}

/// Parse a stored snapshot, dropping malformed records and repeated ids.
fn decode_snapshot(raw: &str) -> Vec<Product> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Wishlist snapshot is not valid JSON");
            return Vec::new();
        }
    };
    let Some(records) = value.as_array() else {
        tracing::warn!("Wishlist snapshot is not a list");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    envelope::decode_items::<Product>(records, "wishlist item")
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

async fn run_writer(storage: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(first) = rx.recv().await {
        // Coalesce whatever is already queued: only the newest snapshot matters.
        let mut latest = None;
        let mut waiters = Vec::new();
        let mut next = Some(first);
        while let Some(request) = next {
            match request {
                WriteRequest::Snapshot(json) => latest = Some(json),
                WriteRequest::Flush(done) => waiters.push(done),
            }
            next = rx.try_recv().ok();
        }

        if let Some(json) = latest {
            let storage = storage.clone();
            let result =
                tokio::task::spawn_blocking(move || storage.set(WISHLIST_KEY, &json)).await;
            match result {
                Ok(Ok(())) => tracing::debug!("Wishlist saved"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Wishlist save failed"),
                Err(e) => tracing::warn!(error = %e, "Wishlist save task failed"),
            }
        }

        for done in waiters {
            let _ = done.send(());
        }
    }
}
