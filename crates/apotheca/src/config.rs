//! CLI configuration: thin wrapper around `apotheca_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --data-dir, --timeout).

use tracing::debug;

use apotheca_core::StoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use apotheca_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `StoreConfig` from the config file, active profile and flags.
///
/// Flags win over the profile, which wins over `[defaults]`.
pub fn resolve_store_config(global: &GlobalOpts) -> Result<StoreConfig, CliError> {
    let cfg = load_config()?;
    let (name, mut profile) = cfg.profile(global.profile.as_deref())?;

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref dir) = global.data_dir {
        profile.data_dir = Some(dir.clone());
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    let store = apotheca_config::profile_to_store_config(&profile, &cfg.defaults)?;
    debug!(
        profile = %name,
        api_url = %store.api_url,
        data_dir = %store.data_dir.display(),
        "resolved store config"
    );
    Ok(store)
}
