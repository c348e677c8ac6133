use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use super::{MemoryStore, MetaStore, SettingsKey, SettingsStore, StoreDocument};
use crate::error::SchemaError;

/// A store persisted as one JSON document. Every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts out empty.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, SchemaError> {
        let path = path.into();
        let document = if path.exists() {
            tracing::debug!("Loading schema store from {}", path.display());
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                StoreDocument::default()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    SchemaError::Storage(format!(
                        "Failed to parse store file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            tracing::info!("Store file {} not found, starting empty", path.display());
            StoreDocument::default()
        };

        Ok(Self {
            path,
            inner: MemoryStore::from_document(document),
        })
    }

    fn persist(&self) -> Result<(), SchemaError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SchemaError::Storage(format!("Failed to create store directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self.inner.document())?;
        fs::write(&self.path, contents).map_err(|e| {
            SchemaError::Storage(format!(
                "Failed to write store file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!("Saved schema store to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>, SchemaError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: SettingsKey, value: Value) -> Result<(), SchemaError> {
        self.inner.set(key, value)?;
        self.persist()
    }
}

impl MetaStore for JsonFileStore {
    fn get_meta(&self, item_id: u64, key: &str) -> Result<Option<Value>, SchemaError> {
        self.inner.get_meta(item_id, key)
    }

    fn set_meta(&mut self, item_id: u64, key: &str, value: Value) -> Result<(), SchemaError> {
        self.inner.set_meta(item_id, key, value)?;
        self.persist()
    }
}
