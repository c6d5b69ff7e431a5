// ── Command API ──
//
// The controller's mutation vocabulary as data, so front ends can build
// a request, hand it to `Controller::execute`, and render the result
// without knowing which method backs it.

use std::sync::Arc;

use crate::model::{Disease, DiseaseDraft, DiseasePatch, Medicine, MedicineDraft, MedicinePatch};

/// Which path a mutation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Applied {
    /// The remote store accepted the change.
    Remote,
    /// The remote store failed; the change exists only locally.
    Local,
}

/// A record produced by a mutation, and how it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<T> {
    pub record: Arc<T>,
    pub applied: Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Applied),
    /// The confirmation callback said no. Nothing changed.
    Declined,
    /// No record with that id. Nothing changed.
    Absent,
}

/// All mutations a front end can request.
///
/// Deletes carry no confirmation step: by the time a command is built
/// the caller has already confirmed.
#[derive(Debug, Clone)]
pub enum Command {
    AddMedicine(MedicineDraft),
    UpdateMedicine { id: String, patch: MedicinePatch },
    DeleteMedicine { id: String },

    AddDisease(DiseaseDraft),
    UpdateDisease { id: String, patch: DiseasePatch },
    DeleteDisease { id: String },

    DismissAdvisory,
}

/// Result of executing a [`Command`].
#[derive(Debug, Clone)]
pub enum CommandResult {
    Medicine(Mutation<Medicine>),
    Disease(Arc<Disease>),
    Deleted(DeleteOutcome),
    Ok,
}
