use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::CacheInvalidator;
use crate::config::SiteConfig;
use crate::error::SchemaError;
use crate::organization::{DefaultOrganization, GlobalOrganization};
use crate::store::{SettingsKey, SettingsStore};

/// Read/update operations behind the organization settings editor.
pub struct OrganizationSettings<S, C> {
    config: SiteConfig,
    store: S,
    invalidator: C,
}

impl<S, C> OrganizationSettings<S, C>
where
    S: SettingsStore,
    C: CacheInvalidator,
{
    pub fn new(config: SiteConfig, store: S, invalidator: C) -> Self {
        Self {
            config,
            store,
            invalidator,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored global record, or the configured defaults when nothing
    /// (or an empty record) has been saved.
    pub fn global(&self) -> Result<GlobalOrganization, SchemaError> {
        Ok(self
            .load(SettingsKey::GlobalOrganization)?
            .unwrap_or_else(|| GlobalOrganization::defaults(&self.config)))
    }

    pub fn default_record(&self) -> Result<DefaultOrganization, SchemaError> {
        Ok(self
            .load(SettingsKey::DefaultOrganization)?
            .unwrap_or_else(|| DefaultOrganization::defaults(&self.config)))
    }

    pub fn update_global(&mut self, data: &Value) -> Result<GlobalOrganization, SchemaError> {
        let sanitized = GlobalOrganization::sanitize(data);
        self.save(SettingsKey::GlobalOrganization, &sanitized)?;
        Ok(sanitized)
    }

    pub fn update_default(&mut self, data: &Value) -> Result<DefaultOrganization, SchemaError> {
        let sanitized = DefaultOrganization::sanitize(data);
        self.save(SettingsKey::DefaultOrganization, &sanitized)?;
        Ok(sanitized)
    }

    fn load<T: DeserializeOwned>(&self, key: SettingsKey) -> Result<Option<T>, SchemaError> {
        match self.store.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                SchemaError::Storage(format!("Stored {} is unreadable: {}", key.as_str(), e))
            }),
        }
    }

    fn save<T: serde::Serialize>(&mut self, key: SettingsKey, record: &T) -> Result<(), SchemaError> {
        let value = serde_json::to_value(record)?;
        tracing::info!("Saving organization settings under {}", key.as_str());
        self.store.set(key, value)?;
        self.invalidator.invalidate(&format!("{} updated", key.as_str()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CountingInvalidator;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn settings() -> (OrganizationSettings<MemoryStore, CountingInvalidator>, CountingInvalidator) {
        let mut config = SiteConfig::new("Acme", "https://acme.test/");
        config.founding_date = Some("2016".into());
        let invalidator = CountingInvalidator::new();
        (
            OrganizationSettings::new(config, MemoryStore::new(), invalidator.clone()),
            invalidator,
        )
    }

    #[test]
    fn test_reads_fall_back_to_defaults() {
        let (settings, invalidator) = settings();
        assert_eq!(settings.global().unwrap().name.as_deref(), Some("Acme"));
        assert_eq!(
            settings.default_record().unwrap().id.as_deref(),
            Some("https://acme.test/#organization")
        );
        assert_eq!(invalidator.count(), 0);
    }

    #[test]
    fn test_update_global_sanitizes_persists_and_purges() {
        let (mut settings, invalidator) = settings();
        let saved = settings
            .update_global(&json!({"name": " Acme Ltd ", "telephone": "+1 555", "rogue": true}))
            .unwrap();

        assert_eq!(saved.name.as_deref(), Some("Acme Ltd"));
        assert_eq!(settings.global().unwrap(), saved);
        assert_eq!(
            settings.store().get(SettingsKey::GlobalOrganization).unwrap(),
            Some(json!({"name": "Acme Ltd", "telephone": "+1 555"}))
        );
        assert_eq!(invalidator.count(), 1);
    }

    #[test]
    fn test_update_default_then_read() {
        let (mut settings, invalidator) = settings();
        settings
            .update_default(&json!({"@id": "https://acme.test/#acme", "name": "Acme"}))
            .unwrap();

        let record = settings.default_record().unwrap();
        assert_eq!(record.id.as_deref(), Some("https://acme.test/#acme"));
        assert_eq!(record.url, None);
        assert_eq!(invalidator.count(), 1);
    }

    #[test]
    fn test_empty_saved_record_reads_as_defaults() {
        let (mut settings, _) = settings();
        settings.update_default(&json!({})).unwrap();
        assert_eq!(
            settings.default_record().unwrap(),
            DefaultOrganization::defaults(settings.config())
        );
    }
}
