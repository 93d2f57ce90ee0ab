use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;

use super::{SettingKey, SettingsChange, SettingsStore};
use crate::error::{Error, Result};

const CHANGE_CAPACITY: usize = 64;

/// Settings held in memory, optionally mirrored to a JSON file.
///
/// Unknown keys in the file are ignored on load and dropped on the next
/// write.
#[derive(Debug)]
pub struct JsonSettingsStore {
    values: RwLock<IndexMap<SettingKey, Value>>,
    path: Option<PathBuf>,
    changes: broadcast::Sender<SettingsChange>,
}

impl JsonSettingsStore {
    /// Creates an empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self::with_values(IndexMap::new(), None)
    }

    /// Opens a store backed by `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            read_file(&path)?
        } else {
            IndexMap::new()
        };
        Ok(Self::with_values(values, Some(path)))
    }

    fn with_values(values: IndexMap<SettingKey, Value>, path: Option<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            values: RwLock::new(values),
            path,
            changes,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for JsonSettingsStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: SettingKey) -> Option<Value> {
        self.values.read().get(&key).cloned()
    }

    fn set(&self, key: SettingKey, value: Value) -> Result<()> {
        {
            let mut values = self.values.write();
            if values.get(&key) == Some(&value) {
                return Ok(());
            }

            if let Some(path) = &self.path {
                let mut next = values.clone();
                next.insert(key, value.clone());
                write_file(path, &next)?;
            }
            values.insert(key, value);
        }

        tracing::debug!(%key, "setting changed");
        // No receivers simply means nobody is listening yet.
        let _ = self.changes.send(SettingsChange { key });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}

fn read_file(path: &Path) -> Result<IndexMap<SettingKey, Value>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::SettingsIo {
        path: path.to_owned(),
        source,
    })?;
    let raw: IndexMap<String, Value> =
        serde_json::from_str(&text).map_err(|source| Error::SettingsFormat {
            path: path.to_owned(),
            source,
        })?;

    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| match SettingKey::from_name(&name) {
            Some(key) => Some((key, value)),
            None => {
                tracing::debug!(%name, "ignoring unknown setting");
                None
            }
        })
        .collect())
}

fn write_file(path: &Path, values: &IndexMap<SettingKey, Value>) -> Result<()> {
    let raw: IndexMap<&str, &Value> = values.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let text = serde_json::to_string_pretty(&raw).map_err(|source| Error::SettingsFormat {
        path: path.to_owned(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| Error::SettingsIo {
        path: path.to_owned(),
        source,
    })
}
