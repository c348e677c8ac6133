//! Storage seams for site settings and per-item metadata.
//!
//! The host owns persistence; the library only needs a key/value view of
//! it. Two implementations are provided: an in-memory store and a single
//! JSON document on disk.

use serde_json::Value;

use crate::error::SchemaError;

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, StoreDocument};

pub const MANUAL_SCHEMA_META_KEY: &str = "_fm_manual_schema";
pub const MERGE_SCHEMA_META_KEY: &str = "_fm_merge_yoast_schema";

/// The two site-scope settings records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    GlobalOrganization,
    DefaultOrganization,
}

impl SettingsKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsKey::GlobalOrganization => "_dream_organization_schema",
            SettingsKey::DefaultOrganization => "_dream_default_organization_schema",
        }
    }
}

pub trait SettingsStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>, SchemaError>;
    fn set(&mut self, key: SettingsKey, value: Value) -> Result<(), SchemaError>;
}

pub trait MetaStore {
    fn get_meta(&self, item_id: u64, key: &str) -> Result<Option<Value>, SchemaError>;
    fn set_meta(&mut self, item_id: u64, key: &str, value: Value) -> Result<(), SchemaError>;

    /// Stored manual schema text, `None` when unset or blank.
    fn manual_schema(&self, item_id: u64) -> Result<Option<String>, SchemaError> {
        Ok(match self.get_meta(item_id, MANUAL_SCHEMA_META_KEY)? {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        })
    }

    /// Whether manual schema is merged into the generated graph. Defaults to true.
    fn merge_enabled(&self, item_id: u64) -> Result<bool, SchemaError> {
        Ok(match self.get_meta(item_id, MERGE_SCHEMA_META_KEY)? {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
            Some(Value::String(s)) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
            Some(_) => true,
        })
    }

    fn set_manual_schema(&mut self, item_id: u64, text: &str) -> Result<(), SchemaError> {
        self.set_meta(item_id, MANUAL_SCHEMA_META_KEY, Value::String(text.to_string()))
    }

    fn set_merge_enabled(&mut self, item_id: u64, enabled: bool) -> Result<(), SchemaError> {
        self.set_meta(item_id, MERGE_SCHEMA_META_KEY, Value::Bool(enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.manual_schema(7).unwrap(), None);
        assert!(store.merge_enabled(7).unwrap());
    }

    #[test]
    fn test_blank_manual_schema_reads_as_none() {
        let mut store = MemoryStore::new();
        store.set_manual_schema(7, "   ").unwrap();
        assert_eq!(store.manual_schema(7).unwrap(), None);

        store.set_manual_schema(7, r#"{"@type": "Person"}"#).unwrap();
        assert_eq!(
            store.manual_schema(7).unwrap().as_deref(),
            Some(r#"{"@type": "Person"}"#)
        );
    }

    #[test]
    fn test_merge_flag_coercion() {
        let mut store = MemoryStore::new();
        for (stored, expected) in [
            (json!(false), false),
            (json!(true), true),
            (json!(""), false),
            (json!("0"), false),
            (json!("1"), true),
            (json!(0), false),
            (json!(null), true),
        ] {
            store.set_meta(1, MERGE_SCHEMA_META_KEY, stored.clone()).unwrap();
            assert_eq!(store.merge_enabled(1).unwrap(), expected, "stored {stored}");
        }
    }
}
