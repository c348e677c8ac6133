//! Merge-by-type of manual schema into a generated schema graph.
//!
//! Manual nodes are matched against generated nodes by effective `@type`.
//! A matched manual node is deep-merged into the first generated node of
//! that type and then leaves the candidate pool; whatever is left over is
//! appended after the generated nodes in its original order.

use serde_json::{map::Entry, Value};

use crate::error::SchemaError;
use crate::template::{self, SchemaDates};
use crate::types::{effective_type, SchemaNode, GRAPH_KEY};

/// Substitute variables, parse and merge `manual_text` into `auto_graph`.
///
/// Blank text (or a document that decodes to nothing) leaves the graph
/// unchanged. Invalid JSON and malformed documents are returned as errors so
/// the caller can decide to fall back to the generated graph.
pub fn merge(
    auto_graph: Vec<Value>,
    manual_text: &str,
    dates: &SchemaDates,
) -> Result<Vec<Value>, SchemaError> {
    if manual_text.trim().is_empty() {
        return Ok(auto_graph);
    }

    let substituted = template::substitute(manual_text, dates);
    let manual_nodes = parse_manual(&substituted)?;
    Ok(merge_nodes(auto_graph, manual_nodes))
}

/// Parse manual schema text into its node sequence.
pub fn parse_manual(text: &str) -> Result<Vec<Value>, SchemaError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = serde_json::from_str(text)?;
    normalize(document)
}

/// Turn a parsed manual document into a node sequence.
///
/// An object carrying `@graph` yields that array, any other object is a
/// single node. Empty documents yield no nodes. Bare arrays and scalars are
/// rejected rather than coerced.
pub fn normalize(document: Value) -> Result<Vec<Value>, SchemaError> {
    if is_empty_document(&document) {
        return Ok(Vec::new());
    }

    match document {
        Value::Object(mut node) => match node.remove(GRAPH_KEY) {
            Some(Value::Array(graph)) => Ok(graph),
            Some(other) => Err(SchemaError::MalformedDocument(format!(
                "@graph must be an array, found {}",
                kind_of(&other)
            ))),
            None => Ok(vec![Value::Object(node)]),
        },
        other => Err(SchemaError::MalformedDocument(format!(
            "expected a JSON object at the top level, found {}",
            kind_of(&other)
        ))),
    }
}

/// Merge already-parsed manual nodes into the generated graph.
pub fn merge_nodes(mut auto_graph: Vec<Value>, mut manual_nodes: Vec<Value>) -> Vec<Value> {
    for node in auto_graph.iter_mut() {
        let Some(type_) = effective_type(node) else {
            continue;
        };

        let Some(index) = manual_nodes
            .iter()
            .position(|candidate| effective_type(candidate) == Some(type_))
        else {
            continue;
        };

        tracing::debug!("Merging manual schema into generated '{}' node", type_);
        let manual = manual_nodes.remove(index);
        if let (Value::Object(target), Value::Object(overrides)) = (node, manual) {
            deep_merge(target, overrides);
        }
    }

    if !manual_nodes.is_empty() {
        tracing::debug!(
            "Appending {} unmatched manual schema node(s)",
            manual_nodes.len()
        );
    }
    auto_graph.extend(manual_nodes);
    auto_graph
}

/// Recursively merge `overrides` into `target`.
///
/// Objects on both sides are merged key by key; in every other case the
/// override value replaces the target value, arrays included.
pub fn deep_merge(target: &mut SchemaNode, overrides: SchemaNode) {
    for (key, value) in overrides {
        match target.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Object(current), Value::Object(incoming)) => {
                    deep_merge(current, incoming);
                }
                (current, incoming) => *current = incoming,
            },
        }
    }
}

fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(node) => node.is_empty(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
