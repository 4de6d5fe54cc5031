use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::KeyValueStore;

/// A store persisted as a flat JSON object.
///
/// ```json
/// {
///   "car_distance_1": "120",
///   "car_size_1": "small",
///   "bus_distance": 40
/// }
/// ```
///
/// Numbers and booleans are accepted on load and read back as their string
/// form; `null` entries are dropped. Every [`KeyValueStore::set`] rewrites the file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Loads the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "Store file missing, starting empty");
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read store '{}'", path.display()))?;
        let raw: BTreeMap<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("store '{}' is not a JSON object", path.display()))?;

        let entries = raw
            .into_iter()
            .filter_map(|(k, v)| {
                let value = match v {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((k, value))
            })
            .collect();

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("failed to write store '{}'", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}
