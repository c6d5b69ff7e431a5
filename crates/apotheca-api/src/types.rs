//! Wire types for the medicine REST service.
//!
//! All types match the JSON bodies under the medicines base path.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! These are a superset of the domain model: numeric ids, optional
//! bookkeeping timestamps, and fields the service may leave out.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::field::Field;

// ── Responses ────────────────────────────────────────────────────────

/// A medicine as returned by every read and write endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// One of: `Ayurvedic`, `Allopathic`, `Homeopathic`, `Other`.
    pub category: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit: Option<String>,
    /// ISO 8601 calendar date (`LocalDate` on the service side).
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dosage_instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub side_effects: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

// ── Requests ─────────────────────────────────────────────────────────

/// Body for `POST /`. Unset optional fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineCreateRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub expiry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Body for `PUT /{id}`.
///
/// Required columns are plain options (absent = unchanged). Optional
/// columns are [`Field`]s so a caller can clear them with an explicit null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Field::is_omitted")]
    pub brand: Field<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
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

// ── Timestamp handling ───────────────────────────────────────────────

/// Accepts RFC 3339 (`2024-06-15T10:30:00Z`) as well as the zone-less
/// `LocalDateTime` form (`2024-06-15T10:30:00.123456`), read as UTC.
pub(crate) mod lenient_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}")))
    }
}
