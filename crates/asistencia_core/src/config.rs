//! Application configuration.
//!
//! # Responsibility
//! - Provide defaults for the data directory, slot key, log level and report
//!   pagination.
//! - Layer an optional TOML file and `ASISTENCIA_*` environment variables on
//!   top of the defaults.
//!
//! # Invariants
//! - Loading never fails on a missing file; only unreadable or malformed
//!   files are errors.
//! - `rows_per_page` is always at least 1.

use crate::logging::default_log_level;
use crate::report::export::DEFAULT_ROWS_PER_PAGE;
use crate::store::mirror::DEFAULT_SLOT_KEY;
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "asistencia-data";
pub const DEFAULT_DB_FILE_NAME: &str = "asistencia.sqlite3";
pub const ENV_DATA_DIR: &str = "ASISTENCIA_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "ASISTENCIA_LOG_LEVEL";
pub const ENV_SLOT_KEY: &str = "ASISTENCIA_SLOT_KEY";
pub const ENV_ROWS_PER_PAGE: &str = "ASISTENCIA_ROWS_PER_PAGE";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Effective runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub slot_key: String,
    pub log_level: String,
    pub rows_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level().to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// Optional overrides read from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    db_file_name: Option<String>,
    slot_key: Option<String>,
    log_level: Option<String>,
    rows_per_page: Option<usize>,
}

impl AppConfig {
    /// Defaults, then `config_path` (if it exists), then environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = config_path {
            config.apply_file(path)?;
        }
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Path of the SQLite file holding the durable slot.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Default directory for exported reports.
    pub fn report_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(value) = file.data_dir {
            self.data_dir = value;
        }
        if let Some(value) = file.db_file_name {
            self.db_file_name = value;
        }
        if let Some(value) = file.slot_key {
            self.slot_key = value;
        }
        if let Some(value) = file.log_level {
            self.log_level = value;
        }
        if let Some(value) = file.rows_per_page {
            self.rows_per_page = value.max(1);
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = lookup(ENV_SLOT_KEY) {
            self.slot_key = value;
        }
        if let Some(value) = lookup(ENV_ROWS_PER_PAGE) {
            match value.trim().parse::<usize>() {
                Ok(rows) => self.rows_per_page = rows.max(1),
                Err(err) => warn!(
                    "event=config_load module=config status=ignored key={} error={}",
                    ENV_ROWS_PER_PAGE, err
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_ROWS_PER_PAGE, ENV_SLOT_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.apply_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asistencia.toml");
        std::fs::write(
            &path,
            "data_dir = \"/var/lib/asistencia\"\nslot_key = \"sesion\"\nrows_per_page = 0\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/asistencia"));
        assert_eq!(config.slot_key, "sesion");
        assert_eq!(config.rows_per_page, 1);
        assert_eq!(
            config.db_path(),
            PathBuf::from("/var/lib/asistencia/asistencia.sqlite3")
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "unknown_key = 1\n").unwrap();

        let err = AppConfig::default().apply_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_and_ignores_bad_numbers() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_SLOT_KEY, "otra"), (ENV_ROWS_PER_PAGE, "muchas")]);
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(config.slot_key, "otra");
        assert_eq!(config.rows_per_page, AppConfig::default().rows_per_page);
    }
}
