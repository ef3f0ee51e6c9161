//! Static game data: upgrade names and per-level durations
//!
//! Loaded best-effort from a data directory laid out as:
//!
//! ```text
//! <catalog_dir>/
//! ├── parsed_json_files/   buildings.json, characters.json, ... ([{id, levels: [...]}])
//! ├── json_maps/           *.json ({key: {id, displayName?, internalName?}})
//! └── upgrade_info/
//!     ├── raw.json         {"<id>": [secs, ...]}
//!     └── mapping.json     {"<id>": "name"}
//! ```
//!
//! Unreadable or malformed files are skipped with a warning. An empty
//! catalog is valid: imports then fall back to placeholder names and the
//! export's own timers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parsed data files and the level key holding their durations
const DURATION_FILES: &[(&str, &str)] = &[
    ("buildings.json", "buildTimeSeconds"),
    ("characters.json", "upgradeTimeSeconds"),
    ("heroes.json", "upgradeTimeSeconds"),
    ("pets.json", "upgradeTimeSeconds"),
    ("spells.json", "upgradeTimeSeconds"),
    ("traps.json", "buildTimeSeconds"),
    ("weapons.json", "buildTimeSeconds"),
    ("mini_levels.json", "buildTimeSeconds"),
    ("seasonal_defense_modules.json", "buildTimeSeconds"),
];

#[derive(Debug, Clone, Default)]
pub struct UpgradeCatalog {
    names: HashMap<i64, String>,
    durations: HashMap<i64, Vec<f64>>,
}

impl UpgradeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load everything found under `dir`
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut catalog = Self::new();

        for folder in candidate_folders(dir, "parsed_json_files") {
            for (file_name, key) in DURATION_FILES {
                let path = folder.join(file_name);
                if !path.exists() {
                    continue;
                }
                match read_json(&path) {
                    Ok(value) => catalog.merge_parsed_durations(&value, key),
                    Err(e) => tracing::warn!(error = %e, "Skipping duration file"),
                }
            }
        }

        // Legacy flat durations only when nothing richer was found
        if catalog.durations.is_empty() {
            let path = dir.join("upgrade_info").join("raw.json");
            if path.exists() {
                match read_json(&path) {
                    Ok(value) => catalog.merge_raw_durations(&value),
                    Err(e) => tracing::warn!(error = %e, "Skipping legacy durations"),
                }
            }
        }

        for folder in candidate_folders(dir, "json_maps") {
            let Ok(entries) = fs::read_dir(&folder) else {
                continue;
            };
            let mut files: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                })
                .collect();
            files.sort();
            for path in files {
                match read_json(&path) {
                    Ok(value) => catalog.merge_json_map(&value),
                    Err(e) => tracing::warn!(error = %e, "Skipping name map"),
                }
            }
        }

        let mapping = dir.join("upgrade_info").join("mapping.json");
        if mapping.exists() {
            match read_json(&mapping) {
                Ok(value) => catalog.merge_flat_names(&value),
                Err(e) => tracing::warn!(error = %e, "Skipping legacy name mapping"),
            }
        }

        tracing::info!(
            names = catalog.names.len(),
            durations = catalog.durations.len(),
            dir = %dir.display(),
            "Loaded upgrade catalog"
        );
        catalog
    }

    pub fn insert_name(&mut self, data_id: i64, name: impl Into<String>) {
        self.names.insert(data_id, name.into());
    }

    pub fn insert_durations(&mut self, data_id: i64, durations: Vec<f64>) {
        if !durations.is_empty() {
            self.durations.insert(data_id, durations);
        }
    }

    pub fn name(&self, data_id: i64) -> Option<&str> {
        self.names.get(&data_id).map(String::as_str)
    }

    /// Nominal duration of the upgrade out of `level`; the index is clamped
    /// to the known levels
    pub fn duration_for(&self, data_id: i64, level: u32) -> Option<f64> {
        let durations = self.durations.get(&data_id)?;
        let last = durations.len().checked_sub(1)?;
        let index = (level.saturating_sub(1) as usize).min(last);
        durations.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.durations.is_empty()
    }

    /// `[{id, levels: [{<key>: secs}]}]`
    fn merge_parsed_durations(&mut self, value: &Value, key: &str) {
        let Some(entries) = value.as_array() else {
            return;
        };
        for entry in entries {
            let Some(id) = entry.get("id").and_then(loose_int) else {
                continue;
            };
            let Some(levels) = entry.get("levels").and_then(Value::as_array) else {
                continue;
            };
            let durations: Vec<f64> = levels
                .iter()
                .filter_map(|level| level.get(key).and_then(loose_float))
                .collect();
            self.insert_durations(id, durations);
        }
    }

    /// `{"<id>": [secs, ...]}`
    fn merge_raw_durations(&mut self, value: &Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (key, secs) in map {
            let (Ok(id), Some(list)) = (key.parse::<i64>(), secs.as_array()) else {
                continue;
            };
            self.insert_durations(id, list.iter().filter_map(loose_float).collect());
        }
    }

    /// `{key: {id, displayName?, internalName?}}`, display name preferred
    fn merge_json_map(&mut self, value: &Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for entry in map.values() {
            let Some(id) = entry.get("id").and_then(loose_int) else {
                continue;
            };
            let display = trimmed_str(entry.get("displayName"));
            let internal = trimmed_str(entry.get("internalName"));
            if let Some(name) = display.or(internal) {
                self.names.insert(id, name.to_string());
            }
        }
    }

    /// `{"<id>": "name"}`; never overrides a name already known
    fn merge_flat_names(&mut self, value: &Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (key, name) in map {
            let (Ok(id), Some(name)) = (key.parse::<i64>(), trimmed_str(Some(name))) else {
                continue;
            };
            self.names.entry(id).or_insert_with(|| name.to_string());
        }
    }
}

fn candidate_folders(dir: &Path, name: &str) -> [PathBuf; 2] {
    [dir.join(name), dir.join("upgrade_info").join(name)]
}

fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Int, float or numeric string
fn loose_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn trimmed_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
