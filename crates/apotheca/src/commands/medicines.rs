//! Medicine command handlers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tabled::Tabled;

use apotheca_core::assist::{AssistProvider, DisabledAssist};
use apotheca_core::views::{self, CategoryFilter, MedicineFilter};
use apotheca_core::{
    Applied, Command as CoreCommand, CommandResult, Controller, DeleteOutcome, Field, Medicine,
    MedicineDraft, MedicinePatch, MedicineQuery,
};

use crate::cli::{
    ClearableField, GlobalOpts, MedicineAddArgs, MedicineUpdateArgs, MedicinesArgs,
    MedicinesCommand, QueryCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MedicineRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl MedicineRow {
    fn new(m: &Medicine, now: DateTime<Utc>) -> Self {
        let mut stock = if m.unit.is_empty() {
            m.quantity.to_string()
        } else {
            format!("{} {}", m.quantity, m.unit)
        };
        if views::is_low_stock(m.quantity) {
            stock.push_str(" (low)");
        }
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            brand: m.brand.clone(),
            category: m.category.to_string(),
            stock,
            expiry: views::expiry_label(m.expiry_date, now),
        }
    }
}

fn detail(m: &Medicine, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:           {}", m.id);
    let _ = writeln!(out, "Name:         {}", m.name);
    if !m.brand.is_empty() {
        let _ = writeln!(out, "Brand:        {}", m.brand);
    }
    let _ = writeln!(out, "Category:     {}", m.category);
    let _ = writeln!(out, "Quantity:     {} {}", m.quantity, m.unit);
    let _ = writeln!(
        out,
        "Expiry:       {} ({})",
        m.expiry_date,
        views::expiry_label(m.expiry_date, now)
    );
    if let Some(made) = m.manufacture_date {
        let _ = writeln!(out, "Manufactured: {made}");
    }
    if let Some(ref location) = m.location {
        let _ = writeln!(out, "Location:     {location}");
    }
    if !m.description.is_empty() {
        let _ = writeln!(out, "Description:  {}", m.description);
    }
    if let Some(ref dosage) = m.dosage_instructions {
        let _ = writeln!(out, "Dosage:       {dosage}");
    }
    if !m.ingredients.is_empty() {
        let _ = writeln!(out, "Ingredients:  {}", output::join(&m.ingredients));
    }
    if !m.side_effects.is_empty() {
        let _ = writeln!(out, "Side effects: {}", output::join(&m.side_effects));
    }
    if !m.benefits.is_empty() {
        let _ = writeln!(out, "Benefits:     {}", output::join(&m.benefits));
    }
    let _ = write!(out, "Updated:      {}", m.last_updated.to_rfc3339());
    out
}

// ── Argument translation ────────────────────────────────────────────

fn draft_from_args(args: &MedicineAddArgs) -> MedicineDraft {
    MedicineDraft {
        brand: args.brand.clone(),
        category: args.category.map(Into::into),
        unit: args.unit.clone(),
        manufacture_date: args.manufactured,
        description: args.description.clone(),
        dosage_instructions: args.dosage.clone(),
        ingredients: util::list_arg(args.ingredients.as_deref()),
        side_effects: util::list_arg(args.side_effects.as_deref()),
        benefits: util::list_arg(args.benefits.as_deref()),
        location: args.location.clone(),
        ..MedicineDraft::new(args.name.clone(), args.quantity, args.expiry)
    }
}

fn patch_from_args(args: MedicineUpdateArgs) -> MedicinePatch {
    let list = |raw: Option<String>| Field::from_option(raw.as_deref().map(apotheca_core::split_list));

    let mut patch = MedicinePatch {
        name: args.name,
        brand: Field::from_option(args.brand),
        category: args.category.map(Into::into),
        quantity: args.quantity,
        unit: args.unit,
        expiry_date: args.expiry,
        manufacture_date: Field::from_option(args.manufactured),
        description: Field::from_option(args.description),
        dosage_instructions: Field::from_option(args.dosage),
        ingredients: list(args.ingredients),
        side_effects: list(args.side_effects),
        benefits: list(args.benefits),
        location: Field::from_option(args.location),
    };

    for field in args.clear {
        match field {
            ClearableField::Brand => patch.brand = Field::Null,
            ClearableField::ManufactureDate => patch.manufacture_date = Field::Null,
            ClearableField::Description => patch.description = Field::Null,
            ClearableField::Dosage => patch.dosage_instructions = Field::Null,
            ClearableField::Ingredients => patch.ingredients = Field::Null,
            ClearableField::SideEffects => patch.side_effects = Field::Null,
            ClearableField::Benefits => patch.benefits = Field::Null,
            ClearableField::Location => patch.location = Field::Null,
        }
    }
    patch
}

fn query_from_command(cmd: QueryCommand) -> MedicineQuery {
    match cmd {
        QueryCommand::All => MedicineQuery::All,
        QueryCommand::Category { category } => MedicineQuery::Category(category.into()),
        QueryCommand::Search { name } => MedicineQuery::Search(name),
        QueryCommand::ExpiringSoon { days: Some(days) } => MedicineQuery::ExpiringSoon { days },
        QueryCommand::ExpiringSoon { days: None } => MedicineQuery::expiring_soon(),
        QueryCommand::Expired => MedicineQuery::Expired,
        QueryCommand::LowStock {
            threshold: Some(threshold),
        } => MedicineQuery::LowStock { threshold },
        QueryCommand::LowStock { threshold: None } => MedicineQuery::low_stock(),
    }
}

fn mutation_status(verb: &str, applied: Applied) -> String {
    match applied {
        Applied::Remote => format!("Medicine {verb}"),
        Applied::Local => format!("Medicine {verb} locally (medicine service unavailable)"),
    }
}

fn not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "Medicine".into(),
        identifier: id.into(),
        list_command: "medicines list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: MedicinesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let now = Utc::now();

    match args.command {
        MedicinesCommand::List { search, category } => {
            let filter = MedicineFilter {
                search: search.unwrap_or_default(),
                category: category.map_or(CategoryFilter::All, |c| CategoryFilter::Only(c.into())),
            };
            let live = controller.inventory(filter);
            let out = output::render_list(
                &global.output,
                &live.current().visible,
                |m| MedicineRow::new(m, now),
                |m| m.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicinesCommand::Get { id, remote } => {
            let medicine = if remote {
                controller.fetch_medicine(&id).await?
            } else {
                let found = controller.store().medicine_by_id(&id).ok_or_else(|| not_found(&id))?;
                Medicine::clone(&found)
            };
            let out = output::render_single(
                &global.output,
                &medicine,
                |m| detail(m, now),
                |m| m.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicinesCommand::Add(args) => {
            let mut draft = draft_from_args(&args);
            if args.assist {
                let category = draft.category.unwrap_or_default();
                match DisabledAssist.medicine_info(&draft.name, category).await {
                    Some(suggestion) => suggestion.fill(&mut draft),
                    None => output::print_status("Suggestions unavailable; saving fields as given", global),
                }
            }

            let CommandResult::Medicine(mutation) =
                controller.execute(CoreCommand::AddMedicine(draft)).await?
            else {
                return Err(CliError::Internal("add returned no medicine".into()));
            };
            output::print_status(&mutation_status("added", mutation.applied), global);

            let out = output::render_single(
                &global.output,
                mutation.record.as_ref(),
                |m| detail(m, now),
                |m| m.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicinesCommand::Update(args) => {
            let id = args.id.clone();
            let patch = patch_from_args(args);
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "no fields given; pass at least one field flag or --clear".into(),
                });
            }

            let result = controller
                .execute(CoreCommand::UpdateMedicine { id, patch })
                .await?;
            let CommandResult::Medicine(mutation) = result else {
                return Ok(());
            };
            output::print_status(&mutation_status("updated", mutation.applied), global);

            let out = output::render_single(
                &global.output,
                mutation.record.as_ref(),
                |m| detail(m, now),
                |m| m.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicinesCommand::Delete { id } => {
            let medicine = controller.store().medicine_by_id(&id).ok_or_else(|| not_found(&id))?;
            let confirmed = util::confirm(
                &format!("Delete medicine '{}' ({id})?", medicine.name),
                global.yes,
            )?;

            match controller.delete_medicine(&id, || confirmed).await? {
                DeleteOutcome::Deleted(applied) => {
                    output::print_status(&mutation_status("deleted", applied), global);
                }
                DeleteOutcome::Declined => output::print_status("Nothing deleted", global),
                DeleteOutcome::Absent => return Err(not_found(&id)),
            }
            Ok(())
        }

        MedicinesCommand::Query(args) => {
            let query = query_from_command(args.command);
            let records = controller.query(&query).await?;
            let out = output::render_list(
                &global.output,
                &records,
                |m| MedicineRow::new(m, now),
                |m| m.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
