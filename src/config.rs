//! Runtime configuration. Everything the gateway needs to reach the database is
//! carried in an explicit [`StoreConfig`] handed over at construction time.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".user-desk";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "users.sqlite";
/// Optional TOML file read from the data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Overrides the database location.
pub const DB_PATH_ENV: &str = "USER_DESK_DB";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Address of the relational store plus per-connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let path = data_dir()
            .map(|dir| dir.join(DB_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(DB_FILE_NAME));
        Self::new(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Defaults to `logs/` inside the data directory when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Read `~/.user-desk/config.toml` when present, then apply the
    /// environment override for the database path.
    pub fn load() -> Result<Self> {
        let path = data_dir()?.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_override(env::var_os(DB_PATH_ENV).map(PathBuf::from));
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse configuration")
    }

    fn apply_env_override(&mut self, db_path: Option<PathBuf>) {
        if let Some(path) = db_path.filter(|p| !p.as_os_str().is_empty()) {
            self.store.path = path;
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("logs")),
        }
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
