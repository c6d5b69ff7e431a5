//! Shared configuration for apotheca front ends.
//!
//! TOML profiles naming a medicine store and a mirror directory, layered
//! with `APOTHECA_` environment variables, and translation to
//! `apotheca_core::StoreConfig`. The CLI adds flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use apotheca_core::{DEFAULT_API_URL, StoreConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named store profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Remote request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    5
}

/// A named store profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the medicines resource.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override mirror directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: None,
            data_dir: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "apotheca", "apotheca")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("apotheca");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where mirror snapshots live when a profile doesn't say otherwise.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("data"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
///
/// Environment keys nest with a double underscore, e.g.
/// `APOTHECA_DEFAULTS__TIMEOUT=10` or `APOTHECA_DEFAULT_PROFILE=clinic`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("APOTHECA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Store config translation ────────────────────────────────────────

impl Config {
    /// Look up a profile by name, or the default profile.
    ///
    /// An absent default profile resolves to [`Profile::default`] so a fresh
    /// install works without any config file.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        match name {
            Some(n) => self
                .profiles
                .get(n)
                .cloned()
                .map(|p| (n.to_owned(), p))
                .ok_or_else(|| ConfigError::UnknownProfile { name: n.into() }),
            None => {
                let n = self.default_profile.clone().unwrap_or_else(|| "default".into());
                let p = self.profiles.get(&n).cloned().unwrap_or_default();
                Ok((n, p))
            }
        }
    }
}

/// Build a `StoreConfig` from a profile and the global defaults.
pub fn profile_to_store_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<StoreConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let data_dir = profile.data_dir.clone().unwrap_or_else(default_data_dir);

    Ok(StoreConfig::new(url, data_dir).with_timeout(timeout))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.defaults.timeout, 5);
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_profile = Some("clinic".into());
        cfg.profiles.insert(
            "clinic".into(),
            Profile {
                api_url: "http://pharmacy.local:8080/api/medicines".into(),
                timeout: Some(12),
                data_dir: Some(dir.path().join("data")),
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn profile_translation_applies_overrides() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "clinic".into(),
            Profile {
                api_url: "http://pharmacy.local:8080/api/medicines".into(),
                timeout: None,
                data_dir: Some(PathBuf::from("/srv/apotheca")),
            },
        );

        let (name, profile) = cfg.profile(Some("clinic")).unwrap();
        let store = profile_to_store_config(&profile, &cfg.defaults).unwrap();

        assert_eq!(name, "clinic");
        assert_eq!(store.api_url.host_str(), Some("pharmacy.local"));
        assert_eq!(store.timeout, Duration::from_secs(5));
        assert_eq!(store.data_dir, PathBuf::from("/srv/apotheca"));
    }

    #[test]
    fn default_profile_works_without_config() {
        let cfg = Config::default();
        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.api_url, DEFAULT_API_URL);
        assert!(matches!(
            cfg.profile(Some("ghost")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_store_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }
}
