use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use seqgen_core::ConflictPolicy;
use seqgen_generate::{DEFAULT_PREVIEW_LIMIT, GenerateOptions};

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = "seqgen.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("settings file already exists: {0}")]
    Exists(PathBuf),
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Search limits. A key left out of `[limits]` means no limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_search_space: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_evaluations: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_ms: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        let options = GenerateOptions::default();
        Self {
            max_search_space: options.max_search_space,
            max_evaluations: options.max_evaluations,
            max_duration_ms: options.max_duration_ms,
        }
    }
}

impl From<&Limits> for GenerateOptions {
    fn from(limits: &Limits) -> Self {
        Self {
            max_search_space: limits.max_search_space,
            max_evaluations: limits.max_evaluations,
            max_duration_ms: limits.max_duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one subdirectory per run.
    pub run_dir: PathBuf,
    /// Filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Sequences printed after a generation.
    pub preview_limit: usize,
    pub conflict_policy: ConflictPolicy,
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_dir: PathBuf::from("runs"),
            log_level: "info".to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            conflict_policy: ConflictPolicy::default(),
            limits: Limits::default(),
        }
    }
}

/// Load settings from `path`, falling back to defaults when it is missing.
pub fn load_settings(path: &Path) -> SettingsResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Write the default settings to `path`.
pub fn init_settings(path: &Path, force: bool) -> SettingsResult<Settings> {
    if path.exists() && !force {
        return Err(SettingsError::Exists(path.to_path_buf()));
    }
    let settings = Settings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> SettingsResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let encoded = toml::to_string_pretty(settings)?;
    std::fs::write(path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("seqgen_settings_{label}_{}", uuid::Uuid::new_v4()))
            .join(SETTINGS_FILE)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings(&temp_path("missing")).expect("load settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.preview_limit, 200);
    }

    #[test]
    fn init_writes_a_loadable_file() {
        let path = temp_path("init");
        let written = init_settings(&path, false).expect("init settings");
        let loaded = load_settings(&path).expect("load settings");
        assert_eq!(written, loaded);

        assert!(matches!(
            init_settings(&path, false),
            Err(SettingsError::Exists(_))
        ));
        assert!(init_settings(&path, true).is_ok());
    }

    #[test]
    fn partial_files_keep_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            preview_limit = 10
            conflict_policy = "prefer_decreasing"

            [limits]
            max_evaluations = 500
            "#,
        )
        .expect("parse settings");

        assert_eq!(settings.preview_limit, 10);
        assert_eq!(settings.conflict_policy, ConflictPolicy::PreferDecreasing);
        assert_eq!(settings.run_dir, PathBuf::from("runs"));
        assert_eq!(settings.limits.max_evaluations, Some(500));
        assert_eq!(settings.limits.max_search_space, None);
    }
}
