use serde_json::{json, Map, Value};

use super::{DefaultOrganization, GlobalOrganization};
use crate::config::SiteConfig;
use crate::types::{has_type, ContentItem, CONTEXT_KEY, ID_KEY, SCHEMA_CONTEXT, TYPE_KEY};

/// Generated node types dropped on pages that show the full organization.
pub const SUPPRESSED_TYPES: [&str; 4] = ["Article", "WebPage", "Person", "BreadcrumbList"];

/// Front page and about page(s) carry the full organization profile.
pub fn is_organization_page(item: &ContentItem, config: &SiteConfig) -> bool {
    item.is_front_page || config.is_about_slug(&item.slug)
}

/// Build the Organization node for `item`.
pub fn organization_node(
    item: &ContentItem,
    config: &SiteConfig,
    global: &GlobalOrganization,
    default: &DefaultOrganization,
) -> Value {
    if is_organization_page(item, config) {
        full_node(global)
    } else {
        minimal_node(default)
    }
}

fn minimal_node(default: &DefaultOrganization) -> Value {
    let mut node = Map::new();
    node.insert(TYPE_KEY.to_string(), json!("Organization"));
    insert_text(&mut node, ID_KEY, &default.id);
    insert_text(&mut node, "name", &default.name);
    insert_text(&mut node, "url", &default.url);
    Value::Object(node)
}

fn insert_text(node: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        node.insert(key.to_string(), json!(value));
    }
}

fn full_node(global: &GlobalOrganization) -> Value {
    let mut node = Map::new();
    node.insert(CONTEXT_KEY.to_string(), json!(SCHEMA_CONTEXT));
    node.insert(TYPE_KEY.to_string(), json!("Organization"));
    insert_text(&mut node, "name", &global.name);
    insert_text(&mut node, "foundingDate", &global.founding_date);

    let founders: Vec<Value> = global
        .founders
        .iter()
        .map(|name| json!({"@type": "Person", "name": name}))
        .collect();
    node.insert("founders".to_string(), Value::Array(founders));

    insert_text(&mut node, "url", &global.url);
    if !global.same_as.is_empty() {
        node.insert("sameAs".to_string(), json!(global.same_as));
    }
    insert_text(&mut node, "logo", &global.logo);
    insert_text(&mut node, "image", &global.image);
    insert_text(&mut node, "description", &global.description);
    insert_text(&mut node, "disambiguatingDescription", &global.disambiguating_description);
    insert_text(&mut node, "alternateName", &global.alternate_name);
    insert_text(&mut node, "telephone", &global.telephone);
    insert_text(&mut node, "legalName", &global.legal_name);

    if global.has_address() {
        let mut address = Map::new();
        address.insert(TYPE_KEY.to_string(), json!("PostalAddress"));
        insert_text(&mut address, "streetAddress", &global.street_address);
        insert_text(&mut address, "addressLocality", &global.address_locality);
        insert_text(&mut address, "addressRegion", &global.address_region);
        insert_text(&mut address, "postalCode", &global.postal_code);
        insert_text(&mut address, "addressCountry", &global.address_country);
        node.insert("address".to_string(), Value::Object(address));
    }

    Value::Object(node)
}

/// Apply the site organization to a generated graph.
///
/// Generated Organization nodes are replaced with the configured one. On
/// organization pages the competing page-level nodes are removed as well.
pub fn filter_host_graph(
    graph: Vec<Value>,
    item: &ContentItem,
    config: &SiteConfig,
    global: &GlobalOrganization,
    default: &DefaultOrganization,
) -> Vec<Value> {
    let organization_page = is_organization_page(item, config);
    let organization = organization_node(item, config, global, default);

    graph
        .into_iter()
        .filter(|node| {
            let suppressed = organization_page
                && SUPPRESSED_TYPES.iter().any(|type_| has_type(node, type_));
            if suppressed {
                tracing::debug!("Suppressing generated {:?} node on organization page", node.get(TYPE_KEY));
            }
            !suppressed
        })
        .map(|node| {
            if has_type(&node, "Organization") {
                organization.clone()
            } else {
                node
            }
        })
        .collect()
}
