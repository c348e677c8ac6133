use crate::cache::CacheInvalidator;
use crate::config::SiteConfig;
use crate::error::SchemaError;
use crate::store::MetaStore;
use crate::types::ContentItem;
use crate::validator;

/// Save-side actions of the per-item schema sidebar.
pub struct ManualSchemaEditor<'a, M, C> {
    config: &'a SiteConfig,
    meta: &'a mut M,
    invalidator: &'a C,
}

impl<'a, M, C> ManualSchemaEditor<'a, M, C>
where
    M: MetaStore,
    C: CacheInvalidator,
{
    pub fn new(config: &'a SiteConfig, meta: &'a mut M, invalidator: &'a C) -> Self {
        Self {
            config,
            meta,
            invalidator,
        }
    }

    /// Validate and store manual schema text together with the merge flag.
    ///
    /// Nothing is written when validation fails.
    pub fn apply(
        &mut self,
        item: &ContentItem,
        text: &str,
        merge_enabled: bool,
    ) -> Result<(), SchemaError> {
        self.ensure_supported(item)?;
        validator::validate_text(text).into_result()?;
        self.store(item, text, merge_enabled)
    }

    /// Store text without validating it, the way a plain post save does.
    pub fn save_unchecked(
        &mut self,
        item: &ContentItem,
        text: &str,
        merge_enabled: bool,
    ) -> Result<(), SchemaError> {
        self.ensure_supported(item)?;
        tracing::warn!("Saving manual schema for item {} without validation", item.id);
        self.store(item, text, merge_enabled)
    }

    pub fn remove(&mut self, item: &ContentItem) -> Result<(), SchemaError> {
        tracing::info!("Removing manual schema from item {}", item.id);
        self.meta.set_manual_schema(item.id, "")?;
        self.on_item_saved(item);
        Ok(())
    }

    /// Purge the page cache after a content save, skipping autosaves,
    /// revisions and post types that are not cached.
    pub fn on_item_saved(&self, item: &ContentItem) -> bool {
        if item.is_autosave || item.is_revision {
            tracing::debug!("Skipping cache purge for autosave/revision of item {}", item.id);
            return false;
        }
        if !self.config.invalidates_cache_for(&item.post_type) {
            return false;
        }
        self.invalidator.invalidate(&format!("{} {} saved", item.post_type, item.id));
        true
    }

    fn store(&mut self, item: &ContentItem, text: &str, merge_enabled: bool) -> Result<(), SchemaError> {
        tracing::info!(
            "Saving manual schema for item {} (merge: {})",
            item.id,
            merge_enabled
        );
        self.meta.set_manual_schema(item.id, text)?;
        self.meta.set_merge_enabled(item.id, merge_enabled)?;
        self.on_item_saved(item);
        Ok(())
    }

    fn ensure_supported(&self, item: &ContentItem) -> Result<(), SchemaError> {
        if self.config.supports(&item.post_type) {
            Ok(())
        } else {
            Err(SchemaError::Validation(format!(
                "Post type '{}' does not accept manual schema",
                item.post_type
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CountingInvalidator;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    const VALID: &str = r#"{"@context": "https://schema.org", "@type": "Person", "name": "Ada"}"#;

    fn page(post_type: &str) -> ContentItem {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        ContentItem::new(3, post_type, date, date)
    }

    #[test]
    fn test_apply_valid_schema_saves_and_purges() {
        let config = SiteConfig::new("Acme", "https://acme.test/");
        let invalidator = CountingInvalidator::new();
        let mut meta = MemoryStore::new();

        ManualSchemaEditor::new(&config, &mut meta, &invalidator)
            .apply(&page("page"), VALID, false)
            .unwrap();

        assert_eq!(meta.manual_schema(3).unwrap().as_deref(), Some(VALID));
        assert!(!meta.merge_enabled(3).unwrap());
        assert_eq!(invalidator.count(), 1);
    }

    #[test]
    fn test_apply_invalid_schema_saves_nothing() {
        let config = SiteConfig::new("Acme", "https://acme.test/");
        let invalidator = CountingInvalidator::new();
        let mut meta = MemoryStore::new();

        let err = ManualSchemaEditor::new(&config, &mut meta, &invalidator)
            .apply(&page("page"), r#"{"@type": "Person", "name": "Ada"}"#, true)
            .unwrap_err();

        assert!(matches!(err, SchemaError::Validation(ref m) if m.contains("@context")));
        assert_eq!(meta.manual_schema(3).unwrap(), None);
        assert_eq!(invalidator.count(), 0);
    }

    #[test]
    fn test_save_unchecked_and_remove() {
        let config = SiteConfig::new("Acme", "https://acme.test/");
        let invalidator = CountingInvalidator::new();
        let mut meta = MemoryStore::new();

        let mut editor = ManualSchemaEditor::new(&config, &mut meta, &invalidator);
        editor.save_unchecked(&page("post"), "{broken", true).unwrap();
        editor.remove(&page("post")).unwrap();

        assert_eq!(meta.manual_schema(3).unwrap(), None);
        assert_eq!(invalidator.count(), 2);
    }

    #[test]
    fn test_unsupported_post_type_rejected() {
        let config = SiteConfig::new("Acme", "https://acme.test/");
        let invalidator = CountingInvalidator::new();
        let mut meta = MemoryStore::new();

        let result = ManualSchemaEditor::new(&config, &mut meta, &invalidator)
            .apply(&page("attachment"), VALID, true);
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_purge_rules() {
        let config = SiteConfig::new("Acme", "https://acme.test/");
        let invalidator = CountingInvalidator::new();
        let mut meta = MemoryStore::new();
        let editor = ManualSchemaEditor::new(&config, &mut meta, &invalidator);

        let mut autosave = page("page");
        autosave.is_autosave = true;
        assert!(!editor.on_item_saved(&autosave));

        let mut revision = page("page");
        revision.is_revision = true;
        assert!(!editor.on_item_saved(&revision));

        assert!(!editor.on_item_saved(&page("fm_profiles")));
        assert!(editor.on_item_saved(&page("post")));
        assert_eq!(invalidator.count(), 1);
    }
}
