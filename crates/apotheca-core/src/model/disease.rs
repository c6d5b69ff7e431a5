// ── Disease registry types ──
//
// Clinical reference records. These live only in the local mirror;
// the remote store has no disease endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Entity;
use crate::error::CoreError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum DiseaseSeverity {
    #[default]
    Mild,
    Medium,
    Chronic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub severity: DiseaseSeverity,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diagnosing_methods: Vec<String>,
    #[serde(default)]
    pub root_causes: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub specialist: String,
    pub last_updated: DateTime<Utc>,
}

impl Entity for Disease {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Disease {
    pub fn from_draft(draft: DiseaseDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            severity: draft.severity,
            symptoms: draft.symptoms,
            diagnosing_methods: draft.diagnosing_methods,
            root_causes: draft.root_causes,
            solutions: draft.solutions,
            specialist: draft.specialist,
            last_updated: now,
        }
    }

    pub fn apply_patch(&mut self, patch: DiseasePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(symptoms) = patch.symptoms {
            self.symptoms = symptoms;
        }
        if let Some(methods) = patch.diagnosing_methods {
            self.diagnosing_methods = methods;
        }
        if let Some(causes) = patch.root_causes {
            self.root_causes = causes;
        }
        if let Some(solutions) = patch.solutions {
            self.solutions = solutions;
        }
        if let Some(specialist) = patch.specialist {
            self.specialist = specialist;
        }
        self.last_updated = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseDraft {
    pub name: String,
    #[serde(default)]
    pub severity: DiseaseSeverity,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diagnosing_methods: Vec<String>,
    #[serde(default)]
    pub root_causes: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub specialist: String,
}

impl DiseaseDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "name".into(),
                reason: "disease name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// Partial update. Every field is absent-means-unchanged; lists are
/// replaced wholesale when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseasePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiseaseSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosing_methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_causes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialist: Option<String>,
}

impl DiseasePatch {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::Validation {
                field: "name".into(),
                reason: "disease name cannot be empty".into(),
            });
        }
        Ok(())
    }
}
