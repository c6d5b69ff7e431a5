// ── Form pre-fill assistance ──
//
// Optional collaborator that suggests descriptive fields for a medicine
// or disease by name. Every call may yield nothing; callers must keep
// working without it. The controller never depends on this module.

use std::future::Future;

use serde::Deserialize;

use crate::model::{DiseaseDraft, MedicineCategory, MedicineDraft};

/// Suggested descriptive fields for a medicine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicineSuggestion {
    pub description: String,
    pub ingredients: Vec<String>,
    pub dosage_instructions: String,
    pub side_effects: Vec<String>,
    pub benefits: Vec<String>,
}

impl MedicineSuggestion {
    /// Copy suggested values into fields the draft leaves empty.
    pub fn fill(self, draft: &mut MedicineDraft) {
        if draft.description.as_deref().is_none_or(str::is_empty) && !self.description.is_empty() {
            draft.description = Some(self.description);
        }
        if draft.dosage_instructions.as_deref().is_none_or(str::is_empty)
            && !self.dosage_instructions.is_empty()
        {
            draft.dosage_instructions = Some(self.dosage_instructions);
        }
        if draft.ingredients.is_empty() {
            draft.ingredients = self.ingredients;
        }
        if draft.side_effects.is_empty() {
            draft.side_effects = self.side_effects;
        }
        if draft.benefits.is_empty() {
            draft.benefits = self.benefits;
        }
    }
}

/// Suggested clinical fields for a disease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiseaseSuggestion {
    pub symptoms: Vec<String>,
    pub diagnosing_methods: Vec<String>,
    pub root_causes: Vec<String>,
    pub solutions: Vec<String>,
    pub specialist: String,
}

impl DiseaseSuggestion {
    pub fn fill(self, draft: &mut DiseaseDraft) {
        if draft.symptoms.is_empty() {
            draft.symptoms = self.symptoms;
        }
        if draft.diagnosing_methods.is_empty() {
            draft.diagnosing_methods = self.diagnosing_methods;
        }
        if draft.root_causes.is_empty() {
            draft.root_causes = self.root_causes;
        }
        if draft.solutions.is_empty() {
            draft.solutions = self.solutions;
        }
        if draft.specialist.is_empty() {
            draft.specialist = self.specialist;
        }
    }
}

/// Source of form suggestions. `None` means "unavailable", for any reason.
pub trait AssistProvider: Send + Sync {
    fn medicine_info(
        &self,
        name: &str,
        category: MedicineCategory,
    ) -> impl Future<Output = Option<MedicineSuggestion>> + Send;

    fn disease_info(&self, name: &str) -> impl Future<Output = Option<DiseaseSuggestion>> + Send;
}

/// The provider used when no assistant is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssist;

impl AssistProvider for DisabledAssist {
    async fn medicine_info(&self, _name: &str, _category: MedicineCategory) -> Option<MedicineSuggestion> {
        None
    }

    async fn disease_info(&self, _name: &str) -> Option<DiseaseSuggestion> {
        None
    }
}
