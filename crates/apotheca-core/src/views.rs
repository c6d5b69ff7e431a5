// ── Derived views ──
//
// Pure projections over collection snapshots: expiry classification,
// dashboard stats, and list filtering. Callers recompute these from each
// new snapshot; nothing here is cached.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;

use crate::model::{Disease, DiseaseSeverity, Medicine, MedicineCategory};

/// Days ahead of now that count as "expiring soon".
pub const EXPIRY_WINDOW_DAYS: i64 = 90;

/// Quantity at or below which a medicine is flagged as low stock.
///
/// Deliberately independent of the remote store's own low-stock default.
pub const LOW_STOCK_QUANTITY: u32 = 2;

const MILLIS_PER_DAY: i64 = 86_400_000;

// ── Expiry ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum ExpiryStatus {
    Expired,
    #[strum(serialize = "Expiring soon")]
    ExpiringSoon,
    Stable,
}

/// The instant a medicine stops being usable: its expiry date at 00:00 UTC.
pub fn expiry_instant(expiry_date: NaiveDate) -> DateTime<Utc> {
    expiry_date.and_time(NaiveTime::MIN).and_utc()
}

pub fn classify_expiry(expiry_date: NaiveDate, now: DateTime<Utc>) -> ExpiryStatus {
    let expiry = expiry_instant(expiry_date);
    if expiry < now {
        ExpiryStatus::Expired
    } else if expiry < now + Duration::days(EXPIRY_WINDOW_DAYS) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Stable
    }
}

/// Whole days until expiry, rounded up. Negative once expired.
pub fn days_until_expiry(expiry_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let millis = (expiry_instant(expiry_date) - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Short badge text for a medicine's expiry.
pub fn expiry_label(expiry_date: NaiveDate, now: DateTime<Utc>) -> String {
    match classify_expiry(expiry_date, now) {
        ExpiryStatus::Expired => "Expired".into(),
        ExpiryStatus::ExpiringSoon => {
            format!("Expiring in {}d", days_until_expiry(expiry_date, now))
        }
        ExpiryStatus::Stable => format!("Safe ({})", expiry_date.format("%Y-%m-%d")),
    }
}

pub fn is_low_stock(quantity: u32) -> bool {
    quantity <= LOW_STOCK_QUANTITY
}

// ── Dashboard stats ────────────────────────────────────────────────

/// Inventory overview. `expired + expiring_soon + stable == total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub stable: usize,
    pub low_stock: usize,
    /// Per-category counts, in the order categories first appear.
    pub category_distribution: IndexMap<MedicineCategory, usize>,
}

pub fn inventory_stats(medicines: &[Arc<Medicine>], now: DateTime<Utc>) -> InventoryStats {
    let mut stats = InventoryStats {
        total: medicines.len(),
        expired: 0,
        expiring_soon: 0,
        stable: 0,
        low_stock: 0,
        category_distribution: IndexMap::new(),
    };

    for med in medicines {
        match classify_expiry(med.expiry_date, now) {
            ExpiryStatus::Expired => stats.expired += 1,
            ExpiryStatus::ExpiringSoon => stats.expiring_soon += 1,
            ExpiryStatus::Stable => stats.stable += 1,
        }
        if is_low_stock(med.quantity) {
            stats.low_stock += 1;
        }
        *stats.category_distribution.entry(med.category).or_insert(0) += 1;
    }

    stats
}

// ── Filtering ──────────────────────────────────────────────────────

/// Category selector for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MedicineCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: MedicineCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(c) => c.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineFilter {
    pub search: String,
    pub category: CategoryFilter,
}

/// Medicines whose name or brand contains `search` (case-insensitive) and
/// whose category passes the filter, soonest expiry first.
pub fn filter_medicines(medicines: &[Arc<Medicine>], filter: &MedicineFilter) -> Vec<Arc<Medicine>> {
    let needle = filter.search.to_lowercase();
    let mut out: Vec<Arc<Medicine>> = medicines
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&needle) || m.brand.to_lowercase().contains(&needle)
        })
        .filter(|m| filter.category.matches(m.category))
        .cloned()
        .collect();
    // Stable: equal dates keep collection order.
    out.sort_by_key(|m| m.expiry_date);
    out
}

pub fn search_diseases(diseases: &[Arc<Disease>], term: &str) -> Vec<Arc<Disease>> {
    let needle = term.to_lowercase();
    diseases
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn chronic_count(diseases: &[Arc<Disease>]) -> usize {
    diseases
        .iter()
        .filter(|d| d.severity == DiseaseSeverity::Chronic)
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DiseaseDraft, MedicineDraft};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap()
    }

    fn med(
        id: &str,
        name: &str,
        brand: &str,
        category: MedicineCategory,
        quantity: u32,
        expiry: NaiveDate,
    ) -> Arc<Medicine> {
        let mut draft = MedicineDraft::new(name, quantity, expiry);
        draft.brand = Some(brand.into());
        draft.category = Some(category);
        Arc::new(Medicine::from_draft(draft, id.into(), now()))
    }

    fn in_days(days: i64) -> NaiveDate {
        (now() + Duration::days(days)).date_naive()
    }

    #[test]
    fn classification_boundaries() {
        let today = now().date_naive();
        assert_eq!(classify_expiry(today, now()), ExpiryStatus::Expired);
        assert_eq!(classify_expiry(in_days(1), now()), ExpiryStatus::ExpiringSoon);
        assert_eq!(classify_expiry(in_days(90), now()), ExpiryStatus::ExpiringSoon);
        assert_eq!(classify_expiry(in_days(91), now()), ExpiryStatus::Stable);
    }

    #[test]
    fn labels_round_days_up() {
        assert_eq!(days_until_expiry(in_days(10), now()), 10);
        assert_eq!(expiry_label(in_days(10), now()), "Expiring in 10d");
        assert_eq!(expiry_label(in_days(-5), now()), "Expired");
        let far = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();
        assert_eq!(expiry_label(far, now()), "Safe (2030-01-02)");
    }

    #[test]
    fn stats_for_mixed_inventory() {
        let meds = vec![
            med("1", "A", "x", MedicineCategory::Ayurvedic, 5, in_days(400)),
            med("2", "B", "y", MedicineCategory::Allopathic, 1, in_days(-5)),
            med("3", "C", "z", MedicineCategory::Ayurvedic, 3, in_days(10)),
        ];

        let stats = inventory_stats(&meds, now());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.expiring_soon, 1);
        assert_eq!(stats.stable, 1);
        assert_eq!(stats.low_stock, 1);
        let order: Vec<_> = stats.category_distribution.iter().collect();
        assert_eq!(
            order,
            vec![
                (&MedicineCategory::Ayurvedic, &2),
                (&MedicineCategory::Allopathic, &1)
            ]
        );
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        assert!(is_low_stock(0));
        assert!(is_low_stock(2));
        assert!(!is_low_stock(3));
    }

    #[test]
    fn buckets_always_sum_to_total() {
        let meds: Vec<_> = (-200..200)
            .step_by(7)
            .enumerate()
            .map(|(i, d)| {
                med(
                    &i.to_string(),
                    "M",
                    "",
                    MedicineCategory::Other,
                    u32::try_from(i % 4).unwrap(),
                    in_days(d),
                )
            })
            .collect();
        let stats = inventory_stats(&meds, now());
        assert_eq!(stats.expired + stats.expiring_soon + stats.stable, stats.total);
    }

    #[test]
    fn filter_by_category_and_search_sorts_by_expiry() {
        let meds = vec![
            med("1", "Ashwagandha Churna", "Patanjali", MedicineCategory::Ayurvedic, 5, in_days(300)),
            med("2", "Paracetamol", "GSK", MedicineCategory::Allopathic, 12, in_days(-20)),
            med("3", "Triphala Guggulu", "Baidyanath", MedicineCategory::Ayurvedic, 2, in_days(-200)),
            med("4", "Chyawanprash", "Dabur Ashram", MedicineCategory::Ayurvedic, 1, in_days(30)),
        ];

        let filter = MedicineFilter {
            search: "ash".into(),
            category: CategoryFilter::Only(MedicineCategory::Ayurvedic),
        };
        let ids: Vec<_> = filter_medicines(&meds, &filter)
            .iter()
            .map(|m| m.id.clone())
            .collect();

        assert_eq!(ids, vec!["4", "1"]);

        let all = filter_medicines(&meds, &MedicineFilter::default());
        let ids: Vec<_> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn category_filter_parses_all() {
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "allopathic".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(MedicineCategory::Allopathic)
        );
    }

    #[test]
    fn disease_search_and_chronic_count() {
        let mk = |id: &str, name: &str, severity| {
            Arc::new(Disease::from_draft(
                DiseaseDraft {
                    name: name.into(),
                    severity,
                    ..DiseaseDraft::default()
                },
                id.into(),
                now(),
            ))
        };
        let diseases = vec![
            mk("1", "Type 2 Diabetes", DiseaseSeverity::Chronic),
            mk("2", "Common Cold", DiseaseSeverity::Mild),
            mk("3", "Asthma", DiseaseSeverity::Chronic),
        ];

        assert_eq!(search_diseases(&diseases, "COLD").len(), 1);
        assert_eq!(search_diseases(&diseases, "").len(), 3);
        assert_eq!(chronic_count(&diseases), 2);
    }
}
