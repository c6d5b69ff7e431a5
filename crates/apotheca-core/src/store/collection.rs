// ── Generic reactive entity collection ──
//
// Ordered storage with push-based change notification via `watch`
// channels. Insertion order is preserved; every mutation publishes a
// fresh immutable snapshot.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Entity;

/// A reactive, ordered collection for a single entity type.
///
/// The snapshot is the source of truth. Every mutation clones the outer
/// vector, applies the change, bumps a version counter, and broadcasts the
/// new snapshot to subscribers. Records themselves are shared `Arc`s.
pub(crate) struct EntityCollection<T: Entity + Clone + Send + Sync + 'static> {
    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, replaced wholesale on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity + Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { version, snapshot }
    }

    /// Replace the entire contents.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        self.publish(values);
    }

    /// Append an entity at the end, returning the shared record.
    pub(crate) fn push(&self, entity: T) -> Arc<T> {
        let entity = Arc::new(entity);
        let mut values = self.to_vec();
        values.push(Arc::clone(&entity));
        self.publish(values);
        entity
    }

    /// Replace the entity with the same id, keeping its position.
    /// Returns `false` if no such entity exists.
    pub(crate) fn replace(&self, entity: T) -> bool {
        let mut values = self.to_vec();
        let Some(slot) = values.iter_mut().find(|e| e.id() == entity.id()) else {
            return false;
        };
        *slot = Arc::new(entity);
        self.publish(values);
        true
    }

    /// Remove an entity by id. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: &str) -> Option<Arc<T>> {
        let mut values = self.to_vec();
        let pos = values.iter().position(|e| e.id() == id)?;
        let removed = values.remove(pos);
        self.publish(values);
        Some(removed)
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.id() == id)
            .map(Arc::clone)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.snapshot.borrow().iter().any(|e| e.id() == id)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Owned copies of every record, in order. Used for mirror writes.
    pub(crate) fn to_records(&self) -> Vec<T> {
        self.snapshot.borrow().iter().map(|e| T::clone(e)).collect()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn to_vec(&self) -> Vec<Arc<T>> {
        self.snapshot.borrow().as_ref().clone()
    }

    fn publish(&self, values: Vec<Arc<T>>) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}
