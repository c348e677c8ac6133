use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Downstream page-cache purge, called after schema-affecting saves.
pub trait CacheInvalidator {
    fn invalidate(&self, reason: &str);
}

/// No page cache in front of the site.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self, reason: &str) {
        tracing::debug!("Cache invalidation skipped (no cache configured): {}", reason);
    }
}

/// Counts purges. Cloned handles share the count.
#[derive(Debug, Default, Clone)]
pub struct CountingInvalidator {
    count: Arc<AtomicUsize>,
}

impl CountingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl CacheInvalidator for CountingInvalidator {
    fn invalidate(&self, reason: &str) {
        let total = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Invalidating page cache ({}), purge #{}", reason, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_invalidator_shares_count() {
        let invalidator = CountingInvalidator::new();
        let handle = invalidator.clone();
        invalidator.invalidate("settings saved");
        handle.invalidate("post saved");
        assert_eq!(invalidator.count(), 2);
    }
}
