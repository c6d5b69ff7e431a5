//! Shared helpers for command handlers.

use apotheca_core::{DiseaseSeverity, MedicineCategory, split_list};

use crate::cli::{CategoryArg, SeverityArg};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Split an optional comma-separated flag value; absent means empty.
pub fn list_arg(raw: Option<&str>) -> Vec<String> {
    raw.map(split_list).unwrap_or_default()
}

impl From<CategoryArg> for MedicineCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Ayurvedic => Self::Ayurvedic,
            CategoryArg::Allopathic => Self::Allopathic,
            CategoryArg::Homeopathic => Self::Homeopathic,
            CategoryArg::Other => Self::Other,
        }
    }
}

impl From<SeverityArg> for DiseaseSeverity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Mild => Self::Mild,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::Chronic => Self::Chronic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_arg_trims_and_drops_blanks() {
        assert_eq!(
            list_arg(Some(" Amla, Haritaki ,, Bibhitaki ")),
            vec!["Amla", "Haritaki", "Bibhitaki"]
        );
        assert!(list_arg(None).is_empty());
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Delete?", true).is_ok_and(|ok| ok));
    }
}
