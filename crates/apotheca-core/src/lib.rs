// apotheca-core: Reconciliation layer between apotheca-api, the local mirror, and front ends.

pub mod assist;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod mirror;
pub mod model;
pub mod seed;
pub mod store;
pub mod stream;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Applied, Command, CommandResult, DeleteOutcome, Mutation};
pub use config::{DEFAULT_API_URL, StoreConfig};
pub use controller::{Advisory, Controller, MedicineQuery, SyncState};
pub use error::CoreError;
pub use mirror::{LocalMirror, MirrorKey};
pub use store::DataStore;
pub use stream::{InventoryView, InventoryWatch, LiveView, RegistryView, RegistryWatch};

// Re-export model types at the crate root for ergonomics.
pub use apotheca_api::Field;
pub use model::{
    Disease, DiseaseDraft, DiseasePatch, DiseaseSeverity, Medicine, MedicineCategory,
    MedicineDraft, MedicinePatch, split_list,
};
