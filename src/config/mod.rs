pub mod persistence;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::history::LineLimits;

pub use persistence::{ConfigError, ConfigPatch, ConfigPersister, ConfigResult};

const APP_DIR: &str = "serial-history";
const HISTORY_FILE_NAME: &str = ".history";

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support").join(APP_DIR))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join(APP_DIR))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join(APP_DIR))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config").join(APP_DIR))
    }
}

/// Directory holding the history file when none is configured.
pub fn get_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
            .map(|d| d.join(APP_DIR))
    }

    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
    pub max_lines: usize,
    pub min_max_lines: usize,
    pub max_max_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let limits = LineLimits::default();
        Self {
            history_file: None,
            max_lines: 1000,
            min_max_lines: limits.minimum,
            max_max_lines: limits.maximum,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Layers the TOML file at `path` (if any) under `SERIAL_HISTORY_*` variables.
    #[must_use]
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("SERIAL_HISTORY").try_parsing(true));

        builder
            .build()
            .and_then(Config::try_deserialize)
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config: {e}");
                Self::default()
            })
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    #[must_use]
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| get_data_dir().map(|dir| dir.join(HISTORY_FILE_NAME)))
    }

    #[must_use]
    pub const fn line_limits(&self) -> LineLimits {
        LineLimits::new(self.min_max_lines, self.max_max_lines)
    }

    pub fn init_default() -> Result<PathBuf, io::Error> {
        let path = Self::get_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }

        fs::write(&path, include_str!("config.template.toml"))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.max_lines, 1000);
        assert_eq!(config.line_limits(), LineLimits::new(10, 1_000_000));
    }

    #[test]
    fn loads_values_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "history_file = \"/tmp/h/.history\"\nmax_lines = 250\n",
        )
        .expect("Failed to write config");

        let config = AppConfig::load_from(Some(&path));

        assert_eq!(config.max_lines, 250);
        assert_eq!(config.min_max_lines, 10);
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/h/.history"))
        );
    }

    #[test]
    fn template_parses() {
        let config: AppConfig =
            toml::from_str(include_str!("config.template.toml")).expect("valid template");
        assert_eq!(config, AppConfig::default());
    }
}
