// ── Built-in sample inventory ──
//
// Shown when the remote store is unreachable and nothing has ever been
// mirrored locally.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Medicine, MedicineCategory};

struct SeedRow {
    id: &'static str,
    name: &'static str,
    brand: &'static str,
    category: MedicineCategory,
    quantity: u32,
    unit: &'static str,
    expiry: (i32, u32, u32),
    description: &'static str,
    ingredients: &'static [&'static str],
}

const SEED: [SeedRow; 3] = [
    SeedRow {
        id: "1",
        name: "Ashwagandha Churna",
        brand: "Patanjali",
        category: MedicineCategory::Ayurvedic,
        quantity: 5,
        unit: "Bottles (100g)",
        expiry: (2025, 12, 30),
        description: "Traditional Ayurvedic herb for stress and energy.",
        ingredients: &["Withania somnifera"],
    },
    SeedRow {
        id: "2",
        name: "Paracetamol",
        brand: "GSK",
        category: MedicineCategory::Allopathic,
        quantity: 12,
        unit: "Strips (10 tabs)",
        expiry: (2024, 5, 15),
        description: "Analgesic and antipyretic for fever and pain.",
        ingredients: &[],
    },
    SeedRow {
        id: "3",
        name: "Triphala Guggulu",
        brand: "Baidyanath",
        category: MedicineCategory::Ayurvedic,
        quantity: 2,
        unit: "Bottles (60 tabs)",
        expiry: (2023, 10, 10),
        description: "Used for detoxification and joint health.",
        ingredients: &[],
    },
];

/// The three sample medicines, stamped with `now` as their update time.
pub fn seed_medicines(now: DateTime<Utc>) -> Vec<Medicine> {
    SEED.iter()
        .filter_map(|row| {
            let (y, m, d) = row.expiry;
            Some(Medicine {
                id: row.id.into(),
                name: row.name.into(),
                brand: row.brand.into(),
                category: row.category,
                quantity: row.quantity,
                unit: row.unit.into(),
                expiry_date: NaiveDate::from_ymd_opt(y, m, d)?,
                manufacture_date: None,
                description: row.description.into(),
                dosage_instructions: None,
                ingredients: row.ingredients.iter().map(|s| (*s).to_owned()).collect(),
                side_effects: Vec::new(),
                benefits: Vec::new(),
                location: None,
                last_updated: now,
            })
        })
        .collect()
}
