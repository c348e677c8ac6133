//! Render-time integration with the host SEO plugin.
//!
//! The host calls [`SchemaPipeline::output_schema`] with the graph it
//! generated for a content item and receives either the merged graph or an
//! instruction to suppress its own output in favour of a standalone script
//! tag. Manual schema that cannot be used never breaks the render.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::cache::CacheInvalidator;
use crate::error::SchemaError;
use crate::merger;
use crate::organization::filter_host_graph;
use crate::settings::OrganizationSettings;
use crate::store::{MetaStore, SettingsStore};
use crate::template;
use crate::types::ContentItem;

pub const SCRIPT_ID: &str = "manual-schema-page";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedSchema {
    /// Emit this graph through the host's normal output.
    Graph(Vec<Value>),
    /// Host output is suppressed; print this script tag in the page head.
    Standalone { script: String },
}

impl RenderedSchema {
    pub fn graph(&self) -> Option<&[Value]> {
        match self {
            RenderedSchema::Graph(graph) => Some(graph),
            RenderedSchema::Standalone { .. } => None,
        }
    }

    pub fn script(&self) -> Option<&str> {
        match self {
            RenderedSchema::Graph(_) => None,
            RenderedSchema::Standalone { script } => Some(script),
        }
    }
}

pub struct SchemaPipeline<'a, M> {
    meta: &'a M,
}

impl<'a, M: MetaStore> SchemaPipeline<'a, M> {
    pub fn new(meta: &'a M) -> Self {
        Self { meta }
    }

    pub fn output_schema(
        &self,
        host_graph: Vec<Value>,
        item: &ContentItem,
    ) -> Result<RenderedSchema, SchemaError> {
        let Some(manual_text) = self.meta.manual_schema(item.id)? else {
            return Ok(RenderedSchema::Graph(host_graph));
        };

        if !self.meta.merge_enabled(item.id)? {
            tracing::debug!("Merging disabled for item {}, rendering standalone", item.id);
            let substituted = template::substitute(&manual_text, &item.dates());
            return Ok(match standalone_script(&substituted) {
                Ok(script) => RenderedSchema::Standalone { script },
                Err(e) => {
                    tracing::warn!("Ignoring unusable manual schema on item {}: {}", item.id, e);
                    RenderedSchema::Graph(host_graph)
                }
            });
        }

        Ok(RenderedSchema::Graph(merge_or_passthrough(
            host_graph,
            &manual_text,
            item,
        )))
    }

    /// Full page render: apply the site organization to the generated graph
    /// first, then the item's manual schema.
    pub fn output_page_schema<S, C>(
        &self,
        host_graph: Vec<Value>,
        item: &ContentItem,
        settings: &OrganizationSettings<S, C>,
    ) -> Result<RenderedSchema, SchemaError>
    where
        S: SettingsStore,
        C: CacheInvalidator,
    {
        let global = settings.global()?;
        let default = settings.default_record()?;
        let host_graph = filter_host_graph(host_graph, item, settings.config(), &global, &default);
        self.output_schema(host_graph, item)
    }
}

fn merge_or_passthrough(host_graph: Vec<Value>, manual_text: &str, item: &ContentItem) -> Vec<Value> {
    let manual_nodes = match merger::parse_manual(&template::substitute(manual_text, &item.dates())) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::warn!("Ignoring unusable manual schema on item {}: {}", item.id, e);
            return host_graph;
        }
    };
    merger::merge_nodes(host_graph, manual_nodes)
}

fn standalone_script(text: &str) -> Result<String, SchemaError> {
    let document: Value = serde_json::from_str(text)?;
    script_tag(&document)
}

/// Wrap a document in the standalone JSON-LD script tag.
///
/// The JSON is pretty-printed with four-space indentation and forward
/// slashes are left unescaped. `<`, `>` and `&` are written as `\u` escapes
/// so string values cannot close the tag.
pub fn script_tag(document: &Value) -> Result<String, SchemaError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    let json = String::from_utf8(buffer)
        .map_err(|e| SchemaError::MalformedDocument(format!("non UTF-8 output: {}", e)))?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");

    Ok(format!(
        "<script type=\"application/ld+json\" id=\"{}\">{}</script>",
        SCRIPT_ID, json
    ))
}
