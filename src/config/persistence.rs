use crate::config::AppConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub history_file: Option<PathBuf>,
    pub max_lines: Option<usize>,
}

impl ConfigPatch {
    #[must_use]
    pub const fn max_lines(max_lines: usize) -> Self {
        Self {
            history_file: None,
            max_lines: Some(max_lines),
        }
    }

    #[must_use]
    pub fn history_file(path: impl Into<PathBuf>) -> Self {
        Self {
            history_file: Some(path.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.history_file.is_none() && self.max_lines.is_none()
    }
}

/// Writes configuration changes made at runtime back to `config.toml`.
pub struct ConfigPersister {
    config_path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfigPersister {
    #[must_use]
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn apply_patch(&self, patch: &ConfigPatch) -> ConfigResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let _lock = self.write_lock.lock();

        let existing = self.read_existing_config()?;

        let merged = Self::merge_config(existing, patch);

        self.atomic_write(&merged)
    }

    fn read_existing_config(&self) -> ConfigResult<AppConfig> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(AppConfig::default())
        }
    }

    fn merge_config(mut existing: AppConfig, patch: &ConfigPatch) -> AppConfig {
        if let Some(ref path) = patch.history_file {
            existing.history_file = Some(path.clone());
        }
        if let Some(max_lines) = patch.max_lines {
            existing.max_lines = max_lines;
        }
        existing
    }

    fn atomic_write(&self, config: &AppConfig) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(config)?;
        let content = format!(
            "# serial-history configuration\n\
             # This file is automatically managed by serial-history.\n\n\
             {toml_content}"
        );

        let temp_path = self.config_path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}
