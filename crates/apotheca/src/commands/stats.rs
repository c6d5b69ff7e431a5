//! Inventory overview handler.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use apotheca_core::views::{InventoryStats, MedicineFilter};
use apotheca_core::{Controller, SyncState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    inventory: InventoryStats,
    diseases: usize,
    chronic_diseases: usize,
    /// "Ready" when the inventory came from the medicine service.
    source: String,
    last_sync: Option<DateTime<Utc>>,
}

fn detail(report: &StatsReport, colored: bool) -> String {
    let inv = &report.inventory;
    let paint = |n: usize, warn: bool| {
        if colored && warn && n > 0 {
            n.red().bold().to_string()
        } else {
            n.to_string()
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "Medicines:      {}", inv.total);
    let _ = writeln!(out, "  Expired:      {}", paint(inv.expired, true));
    let _ = writeln!(out, "  Expiring:     {}", paint(inv.expiring_soon, true));
    let _ = writeln!(out, "  Stable:       {}", inv.stable);
    let _ = writeln!(out, "  Low stock:    {}", paint(inv.low_stock, true));
    for (category, count) in &inv.category_distribution {
        let _ = writeln!(out, "  {category:<13} {count}");
    }
    let _ = writeln!(
        out,
        "Diseases:       {} ({} chronic)",
        report.diseases, report.chronic_diseases
    );
    let sync = report
        .last_sync
        .map_or_else(|| "never".to_owned(), |t| t.to_rfc3339());
    let _ = write!(out, "Source:         {} (last sync: {sync})", report.source);
    out
}

pub fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let inventory = controller.inventory(MedicineFilter::default());
    let registry = controller.registry("");
    let state: SyncState = *controller.medicines_state().borrow();

    let report = StatsReport {
        inventory: inventory.current().stats.clone(),
        diseases: registry.current().diseases.len(),
        chronic_diseases: registry.current().chronic,
        source: state.to_string(),
        last_sync: controller.store().last_sync(),
    };

    let colored = output::should_color(&global.color, &std::io::stdout());
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, colored),
        |r| r.inventory.total.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
