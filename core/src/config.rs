//! User configuration, persisted with confy as TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;
use crate::catalog::UpgradeCatalog;
use crate::storage::StateFile;

pub const APP_NAME: &str = "clashdash";
/// Overrides `api_key` when set
pub const API_KEY_ENV: &str = "CLASHDASH_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[source] confy::ConfyError),
    #[error("failed to store config: {0}")]
    Store(#[source] confy::ConfyError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where `app_state.json` lives
    pub data_dir: PathBuf,
    /// Static game data (names and durations)
    pub catalog_dir: PathBuf,
    pub api_key: Option<String>,
    pub api_base_url: String,
    /// Log to a rolling file here instead of stderr
    pub log_dir: Option<PathBuf>,
    /// Notification lead for profiles that set none of their own
    pub pre_notify_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME);
        let catalog_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join("catalog");
        Self {
            data_dir,
            catalog_dir,
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            log_dir: None,
            pre_notify_minutes: 0,
        }
    }
}

impl AppConfig {
    /// Load from the default location. Callers fall back to
    /// [`AppConfig::default`] on error once logging is up.
    pub fn load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, None).map_err(ConfigError::Load)
    }

    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(ConfigError::Load)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Store)
    }

    pub fn save_path(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Store)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, None).map_err(ConfigError::Load)
    }

    /// Key from the environment, else from the file
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn state_file(&self) -> StateFile {
        StateFile::in_dir(&self.data_dir)
    }

    pub fn load_catalog(&self) -> UpgradeCatalog {
        UpgradeCatalog::load_from_dir(&self.catalog_dir)
    }
}
