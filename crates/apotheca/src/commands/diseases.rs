//! Disease registry command handlers. The registry is local-only.

use std::fmt::Write as _;

use tabled::Tabled;

use apotheca_core::assist::{AssistProvider, DisabledAssist};
use apotheca_core::{
    Command as CoreCommand, CommandResult, Controller, DeleteOutcome, Disease, DiseaseDraft,
    DiseasePatch, split_list,
};

use crate::cli::{DiseaseAddArgs, DiseaseUpdateArgs, DiseasesArgs, DiseasesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DiseaseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Symptoms")]
    symptoms: String,
    #[tabled(rename = "Specialist")]
    specialist: String,
}

impl From<&Disease> for DiseaseRow {
    fn from(d: &Disease) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            severity: d.severity.to_string(),
            symptoms: output::join(&d.symptoms),
            specialist: d.specialist.clone(),
        }
    }
}

fn detail(d: &Disease) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:         {}", d.id);
    let _ = writeln!(out, "Name:       {}", d.name);
    let _ = writeln!(out, "Severity:   {}", d.severity);
    let _ = writeln!(out, "Symptoms:   {}", output::join(&d.symptoms));
    let _ = writeln!(out, "Diagnosis:  {}", output::join(&d.diagnosing_methods));
    let _ = writeln!(out, "Causes:     {}", output::join(&d.root_causes));
    let _ = writeln!(out, "Solutions:  {}", output::join(&d.solutions));
    if !d.specialist.is_empty() {
        let _ = writeln!(out, "Specialist: {}", d.specialist);
    }
    let _ = write!(out, "Updated:    {}", d.last_updated.to_rfc3339());
    out
}

fn draft_from_args(args: &DiseaseAddArgs) -> DiseaseDraft {
    DiseaseDraft {
        name: args.name.clone(),
        severity: args.severity.map(Into::into).unwrap_or_default(),
        symptoms: util::list_arg(args.symptoms.as_deref()),
        diagnosing_methods: util::list_arg(args.diagnosis.as_deref()),
        root_causes: util::list_arg(args.causes.as_deref()),
        solutions: util::list_arg(args.solutions.as_deref()),
        specialist: args.specialist.clone().unwrap_or_default(),
    }
}

fn patch_from_args(args: DiseaseUpdateArgs) -> DiseasePatch {
    let list = |raw: Option<String>| raw.as_deref().map(split_list);
    DiseasePatch {
        name: args.name,
        severity: args.severity.map(Into::into),
        symptoms: list(args.symptoms),
        diagnosing_methods: list(args.diagnosis),
        root_causes: list(args.causes),
        solutions: list(args.solutions),
        specialist: args.specialist,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DiseasesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DiseasesCommand::List { search } => {
            let live = controller.registry(search.unwrap_or_default());
            let out = output::render_list(
                &global.output,
                &live.current().visible,
                |d| DiseaseRow::from(d.as_ref()),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiseasesCommand::Get { id } => {
            let disease = controller
                .store()
                .disease_by_id(&id)
                .ok_or_else(|| not_found(&id))?;
            let out = output::render_single(
                &global.output,
                disease.as_ref(),
                detail,
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiseasesCommand::Add(args) => {
            let mut draft = draft_from_args(&args);
            if args.assist {
                match DisabledAssist.disease_info(&draft.name).await {
                    Some(suggestion) => suggestion.fill(&mut draft),
                    None => output::print_status("Suggestions unavailable; saving fields as given", global),
                }
            }

            let CommandResult::Disease(record) =
                controller.execute(CoreCommand::AddDisease(draft)).await?
            else {
                return Err(CliError::Internal("add returned no disease".into()));
            };
            output::print_status("Disease added", global);

            let out = output::render_single(&global.output, record.as_ref(), detail, |d| {
                d.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiseasesCommand::Update(args) => {
            let id = args.id.clone();
            let patch = patch_from_args(args);

            let CommandResult::Disease(record) = controller
                .execute(CoreCommand::UpdateDisease { id, patch })
                .await?
            else {
                return Err(CliError::Internal("update returned no disease".into()));
            };
            output::print_status("Disease updated", global);

            let out = output::render_single(&global.output, record.as_ref(), detail, |d| {
                d.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiseasesCommand::Delete { id } => {
            let disease = controller
                .store()
                .disease_by_id(&id)
                .ok_or_else(|| not_found(&id))?;
            let confirmed = util::confirm(
                &format!("Delete disease '{}' ({id})?", disease.name),
                global.yes,
            )?;

            match controller.delete_disease(&id, || confirmed).await? {
                DeleteOutcome::Deleted(_) => output::print_status("Disease deleted", global),
                DeleteOutcome::Declined => output::print_status("Nothing deleted", global),
                DeleteOutcome::Absent => return Err(not_found(&id)),
            }
            Ok(())
        }
    }
}

fn not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "Disease".into(),
        identifier: id.into(),
        list_command: "diseases list".into(),
    }
}
