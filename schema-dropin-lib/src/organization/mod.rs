//! Site-wide Organization schema records.
//!
//! There are two records. The *global* one carries the full organization
//! profile and is used on the front page and the about page; the *default*
//! one is a minimal `@id`/`name`/`url` triple used everywhere else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SiteConfig;
use crate::utils::{sanitize_text, sanitize_url};

mod node;

pub use node::{filter_host_graph, is_organization_page, organization_node, SUPPRESSED_TYPES};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalOrganization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founding_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguating_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub founders: Vec<String>,
    #[serde(default, rename = "sameAs", skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

impl GlobalOrganization {
    /// Record used until an administrator saves one.
    pub fn defaults(config: &SiteConfig) -> Self {
        Self {
            name: Some(config.site_name.clone()),
            founding_date: config.founding_date.clone(),
            ..Self::default()
        }
    }

    /// Keep only known fields from a submitted settings body.
    ///
    /// Unknown fields are dropped without error. Text is cleaned, URLs are
    /// normalized and founders/sameAs keep only non-empty entries.
    pub fn sanitize(data: &Value) -> Self {
        let text = |key: &str| data.get(key).and_then(scalar_text).map(|s| sanitize_text(&s));
        let url = |key: &str| data.get(key).and_then(scalar_text).map(|s| sanitize_url(&s));

        Self {
            name: text("name"),
            legal_name: text("legalName"),
            alternate_name: text("alternateName"),
            telephone: text("telephone"),
            founding_date: text("foundingDate"),
            description: text("description"),
            disambiguating_description: text("disambiguatingDescription"),
            url: url("url"),
            logo: url("logo"),
            image: url("image"),
            founders: string_list(data.get("founders"), sanitize_text),
            same_as: string_list(data.get("sameAs"), sanitize_url),
            street_address: text("streetAddress"),
            address_locality: text("addressLocality"),
            address_region: text("addressRegion"),
            postal_code: text("postalCode"),
            address_country: text("addressCountry"),
        }
    }

    pub fn has_address(&self) -> bool {
        [
            &self.street_address,
            &self.address_locality,
            &self.address_region,
            &self.postal_code,
            &self.address_country,
        ]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultOrganization {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DefaultOrganization {
    pub fn defaults(config: &SiteConfig) -> Self {
        Self {
            id: Some(config.organization_id()),
            name: Some(config.site_name.clone()),
            url: Some(config.site_url.clone()),
        }
    }

    pub fn sanitize(data: &Value) -> Self {
        let field = |key: &str| data.get(key).and_then(scalar_text);
        Self {
            id: field("@id").map(|s| sanitize_url(&s)),
            name: field("name").map(|s| sanitize_text(&s)),
            url: field("url").map(|s| sanitize_url(&s)),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>, clean: fn(&str) -> String) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|item| clean(&item))
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_global_sanitize_drops_unknown_fields() {
        let submitted = json!({
            "name": " <em>Acme</em>\n Corp ",
            "foundingDate": 2016,
            "url": "acme.test",
            "logo": "javascript:alert(1)",
            "founders": ["Ada", "", "  Grace  ", {"name": "nested"}],
            "sameAs": ["https://social.test/acme", "not a url at all"],
            "postalCode": "12345",
            "favouriteColour": "red"
        });

        let org = GlobalOrganization::sanitize(&submitted);
        assert_eq!(org.name.as_deref(), Some("Acme Corp"));
        assert_eq!(org.founding_date.as_deref(), Some("2016"));
        assert_eq!(org.url.as_deref(), Some("http://acme.test/"));
        assert_eq!(org.logo.as_deref(), Some(""));
        assert_eq!(org.founders, vec!["Ada", "Grace"]);
        assert_eq!(org.same_as, vec!["https://social.test/acme"]);
        assert!(org.has_address());

        let serialized = serde_json::to_value(&org).unwrap();
        assert!(serialized.get("favouriteColour").is_none());
        assert_eq!(serialized["postalCode"], "12345");
        assert!(serialized.get("telephone").is_none());
    }

    #[test]
    fn test_default_sanitize() {
        let org = DefaultOrganization::sanitize(&json!({
            "@id": "https://acme.test/#acme",
            "name": "Acme",
            "url": "https://acme.test/",
            "@type": "Corporation"
        }));
        assert_eq!(
            serde_json::to_value(&org).unwrap(),
            json!({"@id": "https://acme.test/#acme", "name": "Acme", "url": "https://acme.test/"})
        );
    }

    #[test]
    fn test_defaults_come_from_config() {
        let mut config = SiteConfig::new("Acme", "https://acme.test/");
        config.founding_date = Some("2016".into());

        let global = GlobalOrganization::defaults(&config);
        assert_eq!(global.name.as_deref(), Some("Acme"));
        assert_eq!(global.founding_date.as_deref(), Some("2016"));
        assert!(!global.has_address());

        let default = DefaultOrganization::defaults(&config);
        assert_eq!(default.id.as_deref(), Some("https://acme.test/#organization"));
    }
}
