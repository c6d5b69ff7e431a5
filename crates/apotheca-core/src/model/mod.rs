// ── Domain model ──
//
// Medicines and diseases as the rest of the crate sees them. Wire shapes
// live in apotheca-api; conversion happens in `crate::convert`.

pub mod disease;
pub mod medicine;

pub use disease::{Disease, DiseaseDraft, DiseasePatch, DiseaseSeverity};
pub use medicine::{Medicine, MedicineCategory, MedicineDraft, MedicinePatch};

/// A record addressable by a string id within its collection.
pub trait Entity {
    fn id(&self) -> &str;
}

/// Split comma-separated user input into a list, trimming entries and
/// dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
