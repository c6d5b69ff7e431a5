// ── Controller abstraction ──
//
// Owns the medicine inventory and disease registry for one store.
// Reconciles the remote medicine service with the local mirror: remote
// first, local fallback on any failure, with a user-facing advisory
// describing what went wrong.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use apotheca_api::{
    DEFAULT_EXPIRING_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, MedicineClient, MedicineCreateRequest,
    MedicineUpdateRequest, TransportConfig,
};

use crate::command::{Applied, Command, CommandResult, DeleteOutcome, Mutation};
use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::mirror::{LocalMirror, MirrorKey};
use crate::model::{
    Disease, DiseaseDraft, DiseasePatch, Medicine, MedicineCategory, MedicineDraft, MedicinePatch,
};
use crate::seed::seed_medicines;
use crate::store::DataStore;
use crate::stream::{InventoryWatch, RegistryWatch};
use crate::views::MedicineFilter;

const LOAD_FAILED: &str = "Failed to load medicines. Using local data.";
const ADD_FAILED: &str = "Failed to add medicine. Please try again.";
const UPDATE_FAILED: &str = "Failed to update medicine. Please try again.";
const DELETE_FAILED: &str = "Failed to delete medicine. Please try again.";

// ── Observable state ─────────────────────────────────────────────

/// Where a collection's contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SyncState {
    Loading,
    /// Contents reflect the authoritative source.
    Ready,
    /// The remote store failed; contents are local data.
    Degraded,
}

/// A user-facing notice about a failed remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub message: String,
    /// The underlying error, for logs and verbose output.
    pub cause: Option<String>,
    pub raised_at: DateTime<Utc>,
}

/// Remote read-through queries, one per filtered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicineQuery {
    All,
    Category(MedicineCategory),
    Search(String),
    ExpiringSoon { days: u32 },
    Expired,
    LowStock { threshold: u32 },
}

impl MedicineQuery {
    pub fn expiring_soon() -> Self {
        Self::ExpiringSoon {
            days: DEFAULT_EXPIRING_DAYS,
        }
    }

    pub fn low_stock() -> Self {
        Self::LowStock {
            threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Lifecycle is
/// [`new`](Self::new) → [`initialize`](Self::initialize) → operations →
/// [`shutdown`](Self::shutdown). Mutations are serialized: each one
/// completes (remote call, local apply, mirror write) before the next starts.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: StoreConfig,
    client: MedicineClient,
    mirror: LocalMirror,
    store: Arc<DataStore>,
    medicines_state: watch::Sender<SyncState>,
    diseases_state: watch::Sender<SyncState>,
    advisory: watch::Sender<Option<Advisory>>,
    editing: watch::Sender<Option<String>>,
    write_lock: Mutex<()>,
}

impl Controller {
    /// Create a controller. Does not contact the remote store; call
    /// [`initialize()`](Self::initialize) to load data.
    pub fn new(config: StoreConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = MedicineClient::new(config.api_url.as_str(), &transport)?;
        let mirror = LocalMirror::new(&config.data_dir);

        let (medicines_state, _) = watch::channel(SyncState::Loading);
        let (diseases_state, _) = watch::channel(SyncState::Loading);
        let (advisory, _) = watch::channel(None);
        let (editing, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                mirror,
                store: Arc::new(DataStore::new()),
                medicines_state,
                diseases_state,
                advisory,
                editing,
                write_lock: Mutex::new(()),
            }),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn mirror(&self) -> &LocalMirror {
        &self.inner.mirror
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load medicines from the remote store and diseases from the mirror.
    ///
    /// Never fails on remote errors: medicines fall back to the mirror,
    /// or to the built-in sample set if the mirror is empty, and the
    /// controller enters [`SyncState::Degraded`] with an advisory.
    pub async fn initialize(&self) {
        let _guard = self.inner.write_lock.lock().await;
        self.load_medicines().await;
        self.load_diseases();
    }

    async fn load_medicines(&self) {
        let inner = &self.inner;
        inner.medicines_state.send_replace(SyncState::Loading);

        match inner.client.list_medicines().await {
            Ok(records) => {
                let medicines: Vec<Medicine> = records.into_iter().map(Medicine::from).collect();
                info!(count = medicines.len(), "medicines loaded from remote store");
                inner.store.medicines.replace_all(medicines);
                inner.store.mark_synced(Utc::now());
                self.persist_medicines();
                inner.medicines_state.send_replace(SyncState::Ready);
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "remote load failed, falling back to local data");

                let medicines = match self.mirrored::<Medicine>(MirrorKey::Medicines) {
                    Some(mirrored) if !mirrored.is_empty() => {
                        info!(count = mirrored.len(), "using mirrored medicines");
                        mirrored
                    }
                    _ => {
                        info!("mirror empty, using sample inventory");
                        seed_medicines(Utc::now())
                    }
                };
                inner.store.medicines.replace_all(medicines);
                self.persist_medicines();
                inner.medicines_state.send_replace(SyncState::Degraded);
                self.raise(LOAD_FAILED, &err);
            }
        }
    }

    fn load_diseases(&self) {
        let diseases = self
            .mirrored::<Disease>(MirrorKey::Diseases)
            .unwrap_or_default();
        debug!(count = diseases.len(), "diseases loaded from mirror");
        self.inner.store.diseases.replace_all(diseases);
        self.inner.diseases_state.send_replace(SyncState::Ready);
    }

    /// Flush both collections to the mirror and drop any edit in progress.
    pub async fn shutdown(&self) {
        let _guard = self.inner.write_lock.lock().await;
        self.inner.editing.send_replace(None);
        // Never overwrite the mirror with collections that were never loaded.
        if *self.inner.medicines_state.borrow() != SyncState::Loading {
            self.persist_medicines();
        }
        if *self.inner.diseases_state.borrow() != SyncState::Loading {
            self.persist_diseases();
        }
        debug!("controller shut down");
    }

    /// One-shot: create, initialize, run closure, shut down.
    ///
    /// The closure may use any error type that a [`CoreError`] converts into.
    pub async fn oneshot<F, Fut, T, E>(config: StoreConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let controller = Controller::new(config)?;
        controller.initialize().await;
        let result = f(controller.clone()).await;
        controller.shutdown().await;
        result
    }

    // ── Medicine mutations ───────────────────────────────────────

    /// Create a medicine remotely, or locally if the remote store fails.
    pub async fn add_medicine(&self, draft: MedicineDraft) -> Result<Mutation<Medicine>, CoreError> {
        draft.validate()?;
        let _guard = self.inner.write_lock.lock().await;
        self.dismiss_advisory();

        let request = MedicineCreateRequest::from(&draft);
        let (medicine, applied) = match self.inner.client.create_medicine(&request).await {
            Ok(created) => (Medicine::from(created), Applied::Remote),
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, name = %draft.name, "remote create failed, adding locally");
                self.raise(ADD_FAILED, &err);
                let id = uuid::Uuid::new_v4().to_string();
                (Medicine::from_draft(draft, id, Utc::now()), Applied::Local)
            }
        };

        let record = self.inner.store.medicines.push(medicine);
        self.persist_medicines();

        info!(id = %record.id, %applied, "medicine added");
        Ok(Mutation { record, applied })
    }

    /// Mark a medicine as the target of the next [`update_medicine`](Self::update_medicine).
    pub fn begin_edit(&self, id: &str) -> Result<Arc<Medicine>, CoreError> {
        let medicine = self
            .inner
            .store
            .medicine_by_id(id)
            .ok_or_else(|| not_found("Medicine", id))?;
        self.inner.editing.send_replace(Some(id.to_owned()));
        Ok(medicine)
    }

    pub fn cancel_edit(&self) {
        self.inner.editing.send_replace(None);
    }

    /// The medicine currently being edited, if any.
    pub fn editing(&self) -> Option<Arc<Medicine>> {
        let id = self.inner.editing.borrow().clone()?;
        self.inner.store.medicine_by_id(&id)
    }

    /// Apply `patch` to the current edit target.
    ///
    /// Returns `Ok(None)` when nothing is being edited. The edit target is
    /// cleared once the update has been applied, remotely or locally.
    pub async fn update_medicine(
        &self,
        patch: MedicinePatch,
    ) -> Result<Option<Mutation<Medicine>>, CoreError> {
        patch.validate()?;
        let _guard = self.inner.write_lock.lock().await;

        let Some(id) = self.inner.editing.borrow().clone() else {
            debug!("update requested with no edit target, ignoring");
            return Ok(None);
        };
        let Some(current) = self.inner.store.medicine_by_id(&id) else {
            self.inner.editing.send_replace(None);
            return Err(not_found("Medicine", &id));
        };
        self.dismiss_advisory();

        let request = MedicineUpdateRequest::from(&patch);
        let (medicine, applied) = match self.inner.client.update_medicine(&id, &request).await {
            Ok(updated) => (Medicine::from(updated), Applied::Remote),
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, %id, "remote update failed, updating locally");
                self.raise(UPDATE_FAILED, &err);
                let mut merged = Medicine::clone(&current);
                merged.apply_patch(patch, Utc::now());
                (merged, Applied::Local)
            }
        };

        let record = Arc::new(medicine.clone());
        if !self.inner.store.medicines.replace(medicine) {
            // The server answered with a different id; swap the edited record out.
            self.inner.store.medicines.remove(&id);
            self.inner.store.medicines.push(Medicine::clone(&record));
        }
        self.inner.editing.send_replace(None);
        self.persist_medicines();

        info!(%id, %applied, "medicine updated");
        Ok(Some(Mutation { record, applied }))
    }

    /// Delete a medicine after `confirm` agrees.
    ///
    /// `confirm` runs before anything else. Unknown ids are a no-op and
    /// never reach the remote store. A failed remote delete still removes
    /// the record locally.
    pub async fn delete_medicine(
        &self,
        id: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<DeleteOutcome, CoreError> {
        if !confirm() {
            return Ok(DeleteOutcome::Declined);
        }
        let _guard = self.inner.write_lock.lock().await;

        if !self.inner.store.medicines.contains(id) {
            debug!(%id, "delete of unknown medicine ignored");
            return Ok(DeleteOutcome::Absent);
        }
        self.dismiss_advisory();

        let applied = match self.inner.client.delete_medicine(id).await {
            Ok(()) => Applied::Remote,
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, %id, "remote delete failed, removing locally");
                self.raise(DELETE_FAILED, &err);
                Applied::Local
            }
        };

        self.inner.store.medicines.remove(id);
        self.inner.editing.send_if_modified(|target| {
            if target.as_deref() == Some(id) {
                *target = None;
                true
            } else {
                false
            }
        });
        self.persist_medicines();

        info!(%id, %applied, "medicine deleted");
        Ok(DeleteOutcome::Deleted(applied))
    }

    // ── Disease mutations (local only) ───────────────────────────

    pub async fn add_disease(&self, draft: DiseaseDraft) -> Result<Arc<Disease>, CoreError> {
        draft.validate()?;
        let _guard = self.inner.write_lock.lock().await;

        let disease = Disease::from_draft(draft, uuid::Uuid::new_v4().to_string(), Utc::now());
        let record = self.inner.store.diseases.push(disease);
        self.persist_diseases();

        info!(id = %record.id, "disease added");
        Ok(record)
    }

    pub async fn update_disease(
        &self,
        id: &str,
        patch: DiseasePatch,
    ) -> Result<Arc<Disease>, CoreError> {
        patch.validate()?;
        let _guard = self.inner.write_lock.lock().await;

        let current = self
            .inner
            .store
            .disease_by_id(id)
            .ok_or_else(|| not_found("Disease", id))?;
        let mut disease = Disease::clone(&current);
        disease.apply_patch(patch, Utc::now());

        let record = Arc::new(disease.clone());
        self.inner.store.diseases.replace(disease);
        self.persist_diseases();

        info!(%id, "disease updated");
        Ok(record)
    }

    pub async fn delete_disease(
        &self,
        id: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<DeleteOutcome, CoreError> {
        if !confirm() {
            return Ok(DeleteOutcome::Declined);
        }
        let _guard = self.inner.write_lock.lock().await;

        if self.inner.store.diseases.remove(id).is_none() {
            return Ok(DeleteOutcome::Absent);
        }
        self.persist_diseases();

        info!(%id, "disease deleted");
        Ok(DeleteOutcome::Deleted(Applied::Local))
    }

    // ── Remote read-through ──────────────────────────────────────

    /// Fetch one medicine straight from the remote store. No fallback.
    pub async fn fetch_medicine(&self, id: &str) -> Result<Medicine, CoreError> {
        self.inner
            .client
            .get_medicine(id)
            .await
            .map(Medicine::from)
            .map_err(|e| {
                if e.is_not_found() {
                    not_found("Medicine", id)
                } else {
                    e.into()
                }
            })
    }

    /// Run a filtered query against the remote store. No fallback.
    pub async fn query(&self, query: &MedicineQuery) -> Result<Vec<Medicine>, CoreError> {
        let client = &self.inner.client;
        let records = match query {
            MedicineQuery::All => client.list_medicines().await?,
            MedicineQuery::Category(c) => client.list_by_category(&c.to_string()).await?,
            MedicineQuery::Search(name) => client.search_by_name(name).await?,
            MedicineQuery::ExpiringSoon { days } => client.list_expiring_soon(*days).await?,
            MedicineQuery::Expired => client.list_expired().await?,
            MedicineQuery::LowStock { threshold } => client.list_low_stock(*threshold).await?,
        };
        Ok(records.into_iter().map(Medicine::from).collect())
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command, routing it to the matching method.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::AddMedicine(draft) => self.add_medicine(draft).await.map(CommandResult::Medicine),
            Command::UpdateMedicine { id, patch } => {
                self.begin_edit(&id)?;
                Ok(self
                    .update_medicine(patch)
                    .await?
                    .map_or(CommandResult::Ok, CommandResult::Medicine))
            }
            Command::DeleteMedicine { id } => self
                .delete_medicine(&id, || true)
                .await
                .map(CommandResult::Deleted),
            Command::AddDisease(draft) => self.add_disease(draft).await.map(CommandResult::Disease),
            Command::UpdateDisease { id, patch } => self
                .update_disease(&id, patch)
                .await
                .map(CommandResult::Disease),
            Command::DeleteDisease { id } => self
                .delete_disease(&id, || true)
                .await
                .map(CommandResult::Deleted),
            Command::DismissAdvisory => {
                self.dismiss_advisory();
                Ok(CommandResult::Ok)
            }
        }
    }

    // ── State observation ────────────────────────────────────────

    pub fn medicines_state(&self) -> watch::Receiver<SyncState> {
        self.inner.medicines_state.subscribe()
    }

    pub fn diseases_state(&self) -> watch::Receiver<SyncState> {
        self.inner.diseases_state.subscribe()
    }

    pub fn advisory(&self) -> Option<Advisory> {
        self.inner.advisory.borrow().clone()
    }

    pub fn dismiss_advisory(&self) {
        self.inner.advisory.send_if_modified(|a| a.take().is_some());
    }

    // ── Snapshot accessors (delegate to DataStore) ───────────────

    pub fn medicines_snapshot(&self) -> Arc<Vec<Arc<Medicine>>> {
        self.inner.store.medicines_snapshot()
    }

    pub fn diseases_snapshot(&self) -> Arc<Vec<Arc<Disease>>> {
        self.inner.store.diseases_snapshot()
    }

    // ── Live views (delegate to DataStore) ───────────────────────

    /// Filtered inventory plus stats, recomputed on every change.
    pub fn inventory(&self, filter: MedicineFilter) -> InventoryWatch {
        self.inner.store.watch_inventory(filter)
    }

    pub fn registry(&self, term: impl Into<String>) -> RegistryWatch {
        self.inner.store.watch_registry(term)
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn raise(&self, message: &str, cause: &CoreError) {
        self.inner.advisory.send_replace(Some(Advisory {
            message: message.to_owned(),
            cause: Some(cause.to_string()),
            raised_at: Utc::now(),
        }));
    }

    /// Read a mirror snapshot, treating unreadable data as absent.
    fn mirrored<T: serde::de::DeserializeOwned>(&self, key: MirrorKey) -> Option<Vec<T>> {
        match self.inner.mirror.load(key) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable mirror snapshot");
                None
            }
        }
    }

    fn persist_medicines(&self) {
        let records = self.inner.store.medicines.to_records();
        if let Err(e) = self.inner.mirror.save(MirrorKey::Medicines, &records) {
            warn!(error = %e, "failed to mirror medicines");
        }
    }

    fn persist_diseases(&self) {
        let records = self.inner.store.diseases.to_records();
        if let Err(e) = self.inner.mirror.save(MirrorKey::Diseases, &records) {
            warn!(error = %e, "failed to mirror diseases");
        }
    }
}

fn not_found(entity_type: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        entity_type,
        identifier: id.to_owned(),
    }
}
