// ── API-to-domain type conversions ──
//
// Bridges raw `apotheca_api` wire types into `apotheca_core::model`
// domain types, and back for outbound create/update bodies. Missing
// optional data gets sensible defaults here so nothing downstream has
// to special-case an older server.

use chrono::Utc;
use tracing::debug;

use apotheca_api::{MedicineCreateRequest, MedicineResponse, MedicineUpdateRequest};

use crate::model::{Medicine, MedicineCategory, MedicineDraft, MedicinePatch};

// ── Helpers ────────────────────────────────────────────────────────

/// Map the server's category string, folding anything unknown into `Other`.
fn parse_category(raw: &str) -> MedicineCategory {
    raw.parse().unwrap_or_else(|_| {
        debug!(category = raw, "unknown medicine category, treating as Other");
        MedicineCategory::Other
    })
}

// ── Inbound ────────────────────────────────────────────────────────

impl From<MedicineResponse> for Medicine {
    fn from(r: MedicineResponse) -> Self {
        let last_updated = r.last_updated.or(r.created_at).unwrap_or_else(Utc::now);

        Medicine {
            id: r.id.to_string(),
            name: r.name,
            brand: r.brand.unwrap_or_default(),
            category: parse_category(&r.category),
            quantity: r.quantity,
            unit: r.unit.unwrap_or_default(),
            expiry_date: r.expiry_date,
            manufacture_date: r.manufacture_date,
            description: r.description.unwrap_or_default(),
            dosage_instructions: r.dosage_instructions,
            ingredients: r.ingredients.unwrap_or_default(),
            side_effects: r.side_effects.unwrap_or_default(),
            benefits: r.benefits.unwrap_or_default(),
            location: r.location,
            last_updated,
        }
    }
}

// ── Outbound ───────────────────────────────────────────────────────

impl From<&MedicineDraft> for MedicineCreateRequest {
    fn from(d: &MedicineDraft) -> Self {
        MedicineCreateRequest {
            name: d.name.clone(),
            brand: d.brand.clone(),
            category: d.category.unwrap_or_default().to_string(),
            quantity: d.quantity,
            unit: d.unit.clone(),
            expiry_date: d.expiry_date,
            manufacture_date: d.manufacture_date,
            description: d.description.clone(),
            dosage_instructions: d.dosage_instructions.clone(),
            ingredients: d.ingredients.clone(),
            side_effects: d.side_effects.clone(),
            benefits: d.benefits.clone(),
            location: d.location.clone(),
        }
    }
}

impl From<&MedicinePatch> for MedicineUpdateRequest {
    fn from(p: &MedicinePatch) -> Self {
        MedicineUpdateRequest {
            name: p.name.clone(),
            brand: p.brand.clone(),
            category: p.category.map(|c| c.to_string()),
            quantity: p.quantity,
            unit: p.unit.clone(),
            expiry_date: p.expiry_date,
            manufacture_date: p.manufacture_date.clone(),
            description: p.description.clone(),
            dosage_instructions: p.dosage_instructions.clone(),
            ingredients: p.ingredients.clone(),
            side_effects: p.side_effects.clone(),
            benefits: p.benefits.clone(),
            location: p.location.clone(),
        }
    }
}
