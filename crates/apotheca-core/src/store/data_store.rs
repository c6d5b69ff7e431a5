// ── Central reactive data store ──
//
// Holds the medicine inventory and disease registry. Mutations are
// broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Disease, Medicine};
use crate::stream::{InventoryWatch, RegistryWatch};
use crate::views::MedicineFilter;

/// Central reactive store for medicines and diseases.
///
/// Reads are snapshot clones. Writers go through the controller, which
/// serializes mutations per collection.
pub struct DataStore {
    pub(crate) medicines: EntityCollection<Medicine>,
    pub(crate) diseases: EntityCollection<Disease>,
    pub(crate) last_sync: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_sync, _) = watch::channel(None);

        Self {
            medicines: EntityCollection::new(),
            diseases: EntityCollection::new(),
            last_sync,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn medicines_snapshot(&self) -> Arc<Vec<Arc<Medicine>>> {
        self.medicines.snapshot()
    }

    pub fn diseases_snapshot(&self) -> Arc<Vec<Arc<Disease>>> {
        self.diseases.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn medicine_by_id(&self, id: &str) -> Option<Arc<Medicine>> {
        self.medicines.get(id)
    }

    pub fn disease_by_id(&self, id: &str) -> Option<Arc<Disease>> {
        self.diseases.get(id)
    }

    /// Number of mutations applied to the medicine collection so far.
    pub fn medicines_version(&self) -> u64 {
        self.medicines.version()
    }

    // ── Live views ───────────────────────────────────────────────────

    pub fn watch_inventory(&self, filter: MedicineFilter) -> InventoryWatch {
        InventoryWatch::inventory(self.medicines.subscribe(), filter)
    }

    pub fn watch_registry(&self, term: impl Into<String>) -> RegistryWatch {
        RegistryWatch::registry(self.diseases.subscribe(), term.into())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    /// When medicines were last loaded from the remote store.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.borrow()
    }

    pub(crate) fn mark_synced(&self, at: DateTime<Utc>) {
        self.last_sync.send_modify(|t| *t = Some(at));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
