//! Schema drop-in library
//!
//! Merges hand-authored schema.org JSON-LD into a generated schema graph by
//! `@type`, validates manual documents before they are applied, and manages
//! the site-wide Organization schema records.

mod cache;
mod config;
mod editor;
mod error;
pub mod merger;
mod organization;
mod pipeline;
mod settings;
mod store;
pub mod template;
mod types;
mod utils;
pub mod validator;

pub use cache::{CacheInvalidator, CountingInvalidator, NoopInvalidator};
pub use config::{SiteConfig, CONFIG_TEMPLATE};
pub use editor::ManualSchemaEditor;
pub use error::{SchemaError, ValidationResult};
pub use merger::{deep_merge, merge, merge_nodes, parse_manual};
pub use organization::{
    filter_host_graph, is_organization_page, organization_node, DefaultOrganization,
    GlobalOrganization,
};
pub use pipeline::{script_tag, RenderedSchema, SchemaPipeline, SCRIPT_ID};
pub use settings::OrganizationSettings;
pub use store::{
    JsonFileStore, MemoryStore, MetaStore, SettingsKey, SettingsStore, StoreDocument,
    MANUAL_SCHEMA_META_KEY, MERGE_SCHEMA_META_KEY,
};
pub use template::SchemaDates;
pub use types::{effective_type, ContentItem, SchemaNode, SCHEMA_CONTEXT};
pub use utils::{sanitize_text, sanitize_url};
pub use validator::{validate, validate_text};
