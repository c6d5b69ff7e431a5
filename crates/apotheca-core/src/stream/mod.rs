// ── Live views ──
//
// Derived views that follow a collection. Each new snapshot published by
// the DataStore is projected again (filtered list plus stats), so readers
// never see a view older than the data it came from.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Utc;
use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::{Disease, Medicine};
use crate::views::{self, InventoryStats, MedicineFilter};

type Snapshot<T> = Arc<Vec<Arc<T>>>;
type Projection<T, V> = Arc<dyn Fn(&Snapshot<T>) -> V + Send + Sync>;

// ── Projected views ─────────────────────────────────────────────────

/// The inventory as a list screen shows it.
#[derive(Debug, Clone)]
pub struct InventoryView {
    /// Every medicine, in collection order.
    pub medicines: Snapshot<Medicine>,
    /// Medicines passing the filter, soonest expiry first.
    pub visible: Vec<Arc<Medicine>>,
    /// Stats over the whole inventory, not just `visible`.
    pub stats: InventoryStats,
}

impl InventoryView {
    fn project(medicines: &Snapshot<Medicine>, filter: &MedicineFilter) -> Self {
        Self {
            medicines: Arc::clone(medicines),
            visible: views::filter_medicines(medicines, filter),
            stats: views::inventory_stats(medicines, Utc::now()),
        }
    }
}

/// The disease registry narrowed by a name search.
#[derive(Debug, Clone)]
pub struct RegistryView {
    pub diseases: Snapshot<Disease>,
    pub visible: Vec<Arc<Disease>>,
    pub chronic: usize,
}

impl RegistryView {
    fn project(diseases: &Snapshot<Disease>, term: &str) -> Self {
        Self {
            diseases: Arc::clone(diseases),
            visible: views::search_diseases(diseases, term),
            chronic: views::chronic_count(diseases),
        }
    }
}

// ── LiveView ────────────────────────────────────────────────────────

/// A view of type `V` kept in step with a collection of `T`.
///
/// `current()` is the projection of the snapshot seen at creation or at
/// the last `changed()`. Use `into_stream()` for `StreamExt` combinators.
pub struct LiveView<T: Send + Sync + 'static, V> {
    receiver: watch::Receiver<Snapshot<T>>,
    project: Projection<T, V>,
    current: V,
}

pub type InventoryWatch = LiveView<Medicine, InventoryView>;
pub type RegistryWatch = LiveView<Disease, RegistryView>;

impl<T: Send + Sync + 'static, V> LiveView<T, V> {
    fn new(receiver: watch::Receiver<Snapshot<T>>, project: Projection<T, V>) -> Self {
        let snap = receiver.borrow().clone();
        let current = project(&snap);
        Self {
            receiver,
            project,
            current,
        }
    }

    pub fn current(&self) -> &V {
        &self.current
    }

    /// Wait for the collection to change and re-project.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<&V> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = (self.project)(&snap);
        Some(&self.current)
    }

    /// Yields the projection of the latest snapshot first, then one per change.
    pub fn into_stream(self) -> LiveViewStream<T, V> {
        LiveViewStream {
            inner: WatchStream::new(self.receiver),
            project: self.project,
        }
    }
}

impl InventoryWatch {
    pub(crate) fn inventory(receiver: watch::Receiver<Snapshot<Medicine>>, filter: MedicineFilter) -> Self {
        Self::new(
            receiver,
            Arc::new(move |snap: &Snapshot<Medicine>| InventoryView::project(snap, &filter)),
        )
    }
}

impl RegistryWatch {
    pub(crate) fn registry(receiver: watch::Receiver<Snapshot<Disease>>, term: String) -> Self {
        Self::new(
            receiver,
            Arc::new(move |snap: &Snapshot<Disease>| RegistryView::project(snap, &term)),
        )
    }
}

/// `Stream` adapter over a [`LiveView`].
pub struct LiveViewStream<T: Send + Sync + 'static, V> {
    inner: WatchStream<Snapshot<T>>,
    project: Projection<T, V>,
}

impl<T: Send + Sync + 'static, V> Stream for LiveViewStream<T, V> {
    type Item = V;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        let this = &mut *self;
        Pin::new(&mut this.inner)
            .poll_next(cx)
            .map(|snap| snap.map(|s| (this.project)(&s)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use futures_util::StreamExt;

    use super::*;
    use crate::model::{DiseaseDraft, DiseaseSeverity, MedicineCategory, MedicineDraft};
    use crate::store::DataStore;
    use crate::views::CategoryFilter;

    fn medicine(id: &str, name: &str, category: MedicineCategory, quantity: u32) -> Medicine {
        let mut draft = MedicineDraft::new(name, quantity, NaiveDate::from_ymd_opt(2031, 1, 1).unwrap());
        draft.category = Some(category);
        Medicine::from_draft(draft, id.into(), Utc::now())
    }

    #[tokio::test]
    async fn inventory_view_reprojects_on_change() {
        let store = DataStore::new();
        store.medicines.replace_all(vec![
            medicine("1", "Brahmi Vati", MedicineCategory::Ayurvedic, 1),
            medicine("2", "Ibuprofen", MedicineCategory::Allopathic, 20),
        ]);

        let filter = MedicineFilter {
            search: String::new(),
            category: CategoryFilter::Only(MedicineCategory::Ayurvedic),
        };
        let mut live = InventoryWatch::inventory(store.medicines.subscribe(), filter);
        assert_eq!(live.current().visible.len(), 1);
        assert_eq!(live.current().stats.total, 2);
        assert_eq!(live.current().stats.low_stock, 1);

        store
            .medicines
            .push(medicine("3", "Triphala", MedicineCategory::Ayurvedic, 8));
        let view = live.changed().await.unwrap();
        let names: Vec<_> = view.visible.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Brahmi Vati", "Triphala"]);
        assert_eq!(view.stats.total, 3);
    }

    #[tokio::test]
    async fn registry_stream_counts_chronic_conditions() {
        let store = DataStore::new();
        let mut stream = RegistryWatch::registry(store.diseases.subscribe(), "asth".into()).into_stream();
        let first = stream.next().await.unwrap();
        assert!(first.visible.is_empty());
        assert_eq!(first.chronic, 0);

        let asthma = Disease::from_draft(
            DiseaseDraft {
                name: "Asthma".into(),
                severity: DiseaseSeverity::Chronic,
                ..DiseaseDraft::default()
            },
            "d1".into(),
            Utc::now(),
        );
        store.diseases.push(asthma);

        let next = stream.next().await.unwrap();
        assert_eq!(next.visible.len(), 1);
        assert_eq!(next.chronic, 1);
    }
}
