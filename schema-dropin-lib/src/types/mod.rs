use serde_json::{Map, Value};

mod item;

pub use item::ContentItem;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const CONTEXT_KEY: &str = "@context";
pub const TYPE_KEY: &str = "@type";
pub const GRAPH_KEY: &str = "@graph";
pub const ID_KEY: &str = "@id";

/// A single JSON-LD node. Key order is preserved.
pub type SchemaNode = Map<String, Value>;

/// Resolve the string used for `@type` comparisons.
///
/// A plain string is its own effective type; an array yields its last
/// element. Anything else (missing, null, numbers, an empty array, an array
/// ending in a non-string) has no effective type.
pub fn effective_type(node: &Value) -> Option<&str> {
    match node.get(TYPE_KEY)? {
        Value::String(type_) => Some(type_.as_str()),
        Value::Array(types) => types.last().and_then(Value::as_str),
        _ => None,
    }
}

/// Whether any of the node's declared types equals `type_`.
pub fn has_type(node: &Value, type_: &str) -> bool {
    match node.get(TYPE_KEY) {
        Some(Value::String(declared)) => declared == type_,
        Some(Value::Array(declared)) => declared.iter().any(|t| t.as_str() == Some(type_)),
        _ => false,
    }
}

/// The editor's notion of "present": null, false, zero and the empty
/// string are treated as missing. Arrays and objects always count.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_type_forms() {
        assert_eq!(effective_type(&json!({"@type": "Person"})), Some("Person"));
        assert_eq!(
            effective_type(&json!({"@type": ["Thing", "Organization"]})),
            Some("Organization")
        );
        assert_eq!(effective_type(&json!({"name": "untyped"})), None);
        assert_eq!(effective_type(&json!({"@type": []})), None);
        assert_eq!(effective_type(&json!({"@type": ["Thing", 7]})), None);
        assert_eq!(effective_type(&json!("Person")), None);
    }

    #[test]
    fn test_has_type_checks_every_declared_type() {
        let node = json!({"@type": ["Organization", "Brand"]});
        assert!(has_type(&node, "Organization"));
        assert!(has_type(&node, "Brand"));
        assert!(!has_type(&node, "Person"));
        assert!(has_type(&json!({"@type": "Person"}), "Person"));
    }

    #[test]
    fn test_is_present_truthiness() {
        let doc = json!({
            "empty": "",
            "zero": 0,
            "no": false,
            "null": null,
            "list": [],
            "obj": {},
            "text": "x"
        });
        for key in ["empty", "zero", "no", "null", "missing"] {
            assert!(!is_present(doc.get(key)), "{key} should be absent");
        }
        for key in ["list", "obj", "text"] {
            assert!(is_present(doc.get(key)), "{key} should be present");
        }
    }
}
