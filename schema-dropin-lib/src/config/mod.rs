use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use json_comments::StripComments;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

mod template;

pub use template::CONFIG_TEMPLATE;

fn default_about_slugs() -> Vec<String> {
    vec!["about".to_string()]
}

fn default_supported_post_types() -> Vec<String> {
    ["post", "page", "fm_guides", "faqs", "bct_service", "fm_profiles"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_cache_post_types() -> Vec<String> {
    ["post", "page", "guide", "faq"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("schema-store.json")
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Site-wide settings passed explicitly into the pipeline and services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_url: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub founding_date: Option<String>,
    #[serde(default = "default_about_slugs")]
    pub about_slugs: Vec<String>,
    #[serde(default = "default_supported_post_types")]
    pub supported_post_types: Vec<String>,
    #[serde(default = "default_cache_post_types")]
    pub cache_invalidation_post_types: Vec<String>,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl SiteConfig {
    pub fn new(site_name: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            site_url: site_url.into(),
            organization_id: None,
            founding_date: None,
            about_slugs: default_about_slugs(),
            supported_post_types: default_supported_post_types(),
            cache_invalidation_post_types: default_cache_post_types(),
            store_path: default_store_path(),
            admin_token: None,
            bind: default_bind(),
        }
    }

    /// Load a config file. Comments (`//` and `/* */`) are allowed.
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self, SchemaError> {
        let path = path.into();
        tracing::info!("Loading site config from {:?}", path);
        let file = std::fs::File::open(&path)?;
        let mut stripped = String::new();
        StripComments::new(file).read_to_string(&mut stripped)?;
        let mut config: SiteConfig = serde_json::from_str(&stripped)
            .map_err(|e| SchemaError::Config(format!("{}: {}", path.display(), e)))?;

        if config.store_path.is_relative() {
            if let Some(base) = path.parent() {
                config.store_path = base.join(&config.store_path);
            }
        }
        tracing::info!("Successfully loaded site config: {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.site_name.trim().is_empty() {
            return Err(SchemaError::Config("siteName must not be empty".into()));
        }

        match url::Url::parse(&self.site_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                tracing::error!("Invalid site URL: {}", self.site_url);
                return Err(SchemaError::Config(format!(
                    "siteUrl must be an absolute http(s) URL, got '{}'",
                    self.site_url
                )));
            }
        }

        if let Some(token) = &self.admin_token {
            if token.trim().is_empty() {
                return Err(SchemaError::Config("adminToken must not be blank".into()));
            }
        }

        Ok(())
    }

    /// `@id` of the site organization, derived from the site URL when unset.
    pub fn organization_id(&self) -> String {
        match &self.organization_id {
            Some(id) => id.clone(),
            None => format!("{}/#organization", self.site_url.trim_end_matches('/')),
        }
    }

    pub fn is_about_slug(&self, slug: &str) -> bool {
        self.about_slugs.iter().any(|s| s == slug)
    }

    pub fn supports(&self, post_type: &str) -> bool {
        self.supported_post_types.iter().any(|t| t == post_type)
    }

    pub fn invalidates_cache_for(&self, post_type: &str) -> bool {
        self.cache_invalidation_post_types.iter().any(|t| t == post_type)
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}
