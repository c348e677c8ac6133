use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::template::SchemaDates;

/// A content item as handed over by the host at render or save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: u64,
    pub post_type: String,
    #[serde(default)]
    pub slug: String,
    pub created: NaiveDate,
    pub modified: NaiveDate,
    #[serde(default)]
    pub is_front_page: bool,
    #[serde(default)]
    pub is_autosave: bool,
    #[serde(default)]
    pub is_revision: bool,
}

impl ContentItem {
    pub fn new(id: u64, post_type: impl Into<String>, created: NaiveDate, modified: NaiveDate) -> Self {
        Self {
            id,
            post_type: post_type.into(),
            slug: String::new(),
            created,
            modified,
            is_front_page: false,
            is_autosave: false,
            is_revision: false,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn front_page(mut self) -> Self {
        self.is_front_page = true;
        self
    }

    pub fn dates(&self) -> SchemaDates {
        SchemaDates::new(self.created, self.modified)
    }
}
