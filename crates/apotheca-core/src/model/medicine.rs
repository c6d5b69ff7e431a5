// ── Medicine domain types ──
//
// Stock-keeping records plus the create/update inputs the controller
// accepts. Serialized with camelCase keys so local snapshots keep the
// same shape the practice has always stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use apotheca_api::Field;

use super::Entity;
use crate::error::CoreError;

/// Therapeutic tradition a medicine belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum MedicineCategory {
    #[default]
    Ayurvedic,
    Allopathic,
    Homeopathic,
    Other,
}

impl MedicineCategory {
    pub const ALL: [Self; 4] = [
        Self::Ayurvedic,
        Self::Allopathic,
        Self::Homeopathic,
        Self::Other,
    ];
}

/// A stock-keeping record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: MedicineCategory,
    pub quantity: u32,
    #[serde(default)]
    pub unit: String,
    pub expiry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_instructions: Option<String>,
    /// Display order only.
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Entity for Medicine {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Medicine {
    /// Materialize a draft locally, for when the remote store cannot assign an id.
    pub fn from_draft(draft: MedicineDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            brand: draft.brand.unwrap_or_default(),
            category: draft.category.unwrap_or_default(),
            quantity: draft.quantity,
            unit: draft.unit.unwrap_or_default(),
            expiry_date: draft.expiry_date,
            manufacture_date: draft.manufacture_date,
            description: draft.description.unwrap_or_default(),
            dosage_instructions: draft.dosage_instructions,
            ingredients: draft.ingredients,
            side_effects: draft.side_effects,
            benefits: draft.benefits,
            location: draft.location,
            last_updated: now,
        }
    }

    /// Merge a partial update into this record and refresh `last_updated`.
    pub fn apply_patch(&mut self, patch: MedicinePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(expiry) = patch.expiry_date {
            self.expiry_date = expiry;
        }
        patch.brand.apply_or_default(&mut self.brand);
        patch.description.apply_or_default(&mut self.description);
        patch.manufacture_date.apply_to_option(&mut self.manufacture_date);
        patch
            .dosage_instructions
            .apply_to_option(&mut self.dosage_instructions);
        patch.location.apply_to_option(&mut self.location);
        patch.ingredients.apply_or_default(&mut self.ingredients);
        patch.side_effects.apply_or_default(&mut self.side_effects);
        patch.benefits.apply_or_default(&mut self.benefits);
        self.last_updated = now;
    }
}

// ── Inputs ───────────────────────────────────────────────────────────

/// Everything needed to create a medicine. `id` and `last_updated` are
/// assigned by whoever stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDraft {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Defaults to [`MedicineCategory::Ayurvedic`] when unset.
    #[serde(default)]
    pub category: Option<MedicineCategory>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit: Option<String>,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dosage_instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl MedicineDraft {
    /// A draft with only the required fields set.
    pub fn new(name: impl Into<String>, quantity: u32, expiry_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            brand: None,
            category: None,
            quantity,
            unit: None,
            expiry_date,
            manufacture_date: None,
            description: None,
            dosage_instructions: None,
            ingredients: Vec::new(),
            side_effects: Vec::new(),
            benefits: Vec::new(),
            location: None,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "name".into(),
                reason: "medicine name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// A full or partial replacement of a medicine's fields.
///
/// Required columns use `Option` (absent = unchanged). Optional columns use
/// [`Field`] so they can be cleared explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicinePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub brand: Field<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MedicineCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub manufacture_date: Field<NaiveDate>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub description: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub dosage_instructions: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub ingredients: Field<Vec<String>>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub side_effects: Field<Vec<String>>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub benefits: Field<Vec<String>>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub location: Field<String>,
}

impl MedicinePatch {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::Validation {
                field: "name".into(),
                reason: "medicine name cannot be empty".into(),
            });
        }
        Ok(())
    }

    /// Whether the patch changes nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample() -> Medicine {
        let mut draft = MedicineDraft::new(
            "Ashwagandha Churna",
            5,
            NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
        );
        draft.brand = Some("Patanjali".into());
        draft.location = Some("Shelf A".into());
        draft.ingredients = vec!["Withania somnifera".into()];
        Medicine::from_draft(draft, "m1".into(), now())
    }

    #[test]
    fn from_draft_fills_defaults() {
        let med = sample();
        assert_eq!(med.category, MedicineCategory::Ayurvedic);
        assert_eq!(med.description, "");
        assert_eq!(med.unit, "");
        assert_eq!(med.last_updated, now());
    }

    #[test]
    fn patch_merges_and_clears() {
        let mut med = sample();
        let later = now() + chrono::Duration::hours(1);

        med.apply_patch(
            MedicinePatch {
                quantity: Some(1),
                brand: Field::Null,
                location: Field::Null,
                benefits: Field::Present(vec!["Sleep".into()]),
                ..MedicinePatch::default()
            },
            later,
        );

        assert_eq!(med.quantity, 1);
        assert_eq!(med.brand, "");
        assert_eq!(med.location, None);
        assert_eq!(med.benefits, vec!["Sleep".to_string()]);
        assert_eq!(med.ingredients, vec!["Withania somnifera".to_string()]);
        assert_eq!(med.name, "Ashwagandha Churna");
        assert_eq!(med.last_updated, later);
    }

    #[test]
    fn blank_names_are_rejected() {
        let draft = MedicineDraft::new("   ", 1, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(
            draft.validate(),
            Err(CoreError::Validation { ref field, .. }) if field == "name"
        ));

        let patch = MedicinePatch {
            name: Some(String::new()),
            ..MedicinePatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(MedicinePatch::default().is_empty());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "homeopathic".parse::<MedicineCategory>().unwrap(),
            MedicineCategory::Homeopathic
        );
        assert_eq!(MedicineCategory::Allopathic.to_string(), "Allopathic");
        assert!("herbal".parse::<MedicineCategory>().is_err());
    }

    #[test]
    fn stored_shape_tolerates_missing_lists() {
        let raw = serde_json::json!({
            "id": "2",
            "name": "Paracetamol",
            "brand": "GSK",
            "category": "Allopathic",
            "quantity": 12,
            "unit": "Strips (10 tabs)",
            "expiryDate": "2024-05-15",
            "description": "Analgesic and antipyretic for fever and pain.",
            "lastUpdated": "2024-06-01T12:00:00Z"
        });
        let med: Medicine = serde_json::from_value(raw).unwrap();
        assert!(med.ingredients.is_empty());
        assert_eq!(med.last_updated, now());
    }
}
