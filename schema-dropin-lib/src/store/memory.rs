use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{MetaStore, SettingsKey, SettingsStore};
use crate::error::SchemaError;

/// Everything a store holds: site options plus metadata per content item.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub items: BTreeMap<u64, Map<String, Value>>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    document: StoreDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: StoreDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>, SchemaError> {
        Ok(self.document.options.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: SettingsKey, value: Value) -> Result<(), SchemaError> {
        self.document.options.insert(key.as_str().to_string(), value);
        Ok(())
    }
}

impl MetaStore for MemoryStore {
    fn get_meta(&self, item_id: u64, key: &str) -> Result<Option<Value>, SchemaError> {
        Ok(self
            .document
            .items
            .get(&item_id)
            .and_then(|meta| meta.get(key))
            .cloned())
    }

    fn set_meta(&mut self, item_id: u64, key: &str, value: Value) -> Result<(), SchemaError> {
        self.document
            .items
            .entry(item_id)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}
