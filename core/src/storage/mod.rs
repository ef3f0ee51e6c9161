//! On-disk app state
//!
//! One JSON snapshot (`app_state.json`) under the data directory. Loading is
//! best-effort: a missing file is `None`, a current-format snapshot is used
//! as-is, an early single-profile snapshot is upgraded, and anything else is
//! logged and ignored. Saving replaces the file atomically.

mod state;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use state::{AppState, STATE_VERSION};

const STATE_FILE_NAME: &str = "app_state.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize app state")]
    Serialize(#[from] serde_json::Error),
}

/// Location of the persisted snapshot
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `app_state.json` inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<AppState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to read app state");
                return None;
            }
        };

        let mut state = match serde_json::from_str::<AppState>(&content) {
            Ok(state) => state,
            Err(current_err) => match serde_json::from_str::<state::LegacyAppState>(&content) {
                Ok(legacy) => {
                    tracing::info!("Upgrading single-profile app state");
                    AppState::from(legacy)
                }
                Err(_) => {
                    tracing::warn!(error = %current_err, "Failed to parse app state, ignoring");
                    return None;
                }
            },
        };

        if state.version > STATE_VERSION {
            tracing::warn!(
                version = state.version,
                supported = STATE_VERSION,
                "App state written by a newer version"
            );
        }
        state.migrate_notification_settings();
        Some(state)
    }

    /// Write via a sibling temp file and rename
    pub fn save(&self, state: &AppState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Saved app state");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
