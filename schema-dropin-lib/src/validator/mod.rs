//! Interactive validation of manual JSON-LD documents.
//!
//! The checks mirror what the editor sidebar enforces before a manual schema
//! is applied: a schema.org `@context`, a `@type`, and a handful of required
//! properties for common types. Messages are meant to be shown to editors
//! verbatim.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationResult;
use crate::types::{is_present, CONTEXT_KEY, GRAPH_KEY, SCHEMA_CONTEXT, TYPE_KEY};

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format. Please check your schema syntax.";

fn type_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("valid type name pattern"))
}

/// Required-field rules keyed by effective type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeRule {
    Article,
    FaqPage,
    HowTo,
    NameRequired,
    Custom,
}

impl TypeRule {
    fn for_type(type_: &str) -> Self {
        match type_ {
            "Article" => TypeRule::Article,
            "FAQPage" => TypeRule::FaqPage,
            "HowTo" => TypeRule::HowTo,
            "Organization" | "Person" | "Product" | "WebPage" => TypeRule::NameRequired,
            _ => TypeRule::Custom,
        }
    }

    fn check(self, type_: &str, document: &Value) -> ValidationResult {
        match self {
            TypeRule::Article => {
                if !is_present(document.get("headline")) {
                    return ValidationResult::error("Article schema must include headline.");
                }
                if !is_present(document.get("datePublished")) {
                    return ValidationResult::error("Article schema must include datePublished.");
                }
            }
            TypeRule::FaqPage => {
                if !matches!(document.get("mainEntity"), Some(Value::Array(_))) {
                    return ValidationResult::error("FAQPage schema must include mainEntity array.");
                }
            }
            TypeRule::HowTo => {
                if !is_present(document.get("name")) {
                    return ValidationResult::error("HowTo schema must include name.");
                }
                if !matches!(document.get("step"), Some(Value::Array(_))) {
                    return ValidationResult::error("HowTo schema must include step array.");
                }
            }
            TypeRule::NameRequired => {
                if !is_present(document.get("name")) {
                    return ValidationResult::error(format!(
                        "{} schema must include name.",
                        type_
                    ));
                }
            }
            TypeRule::Custom => return check_custom_type(type_, document),
        }
        ValidationResult::Ok
    }
}

fn check_custom_type(type_: &str, document: &Value) -> ValidationResult {
    if !is_present(document.get("name")) && !is_present(document.get("description")) {
        return ValidationResult::error(format!(
            "Custom type \"{}\" should include either name or description.",
            type_
        ));
    }

    if !type_name_pattern().is_match(type_) {
        return ValidationResult::error(format!(
            "Type \"{}\" should follow schema.org naming convention (PascalCase).",
            type_
        ));
    }

    let url = document.get("url");
    if is_present(url) && !matches!(url, Some(Value::String(_))) {
        return ValidationResult::error("URL property must be a string.");
    }

    let image = document.get("image");
    if is_present(image) && !matches!(image, Some(Value::String(_)) | Some(Value::Object(_))) {
        return ValidationResult::error("Image property must be a string or object.");
    }

    ValidationResult::Ok
}

/// Validate a parsed JSON-LD document.
///
/// Graph envelopes are checked element by element with the full rule set,
/// so every element needs its own `@context` and `@type`.
pub fn validate(document: &Value) -> ValidationResult {
    if document.get(CONTEXT_KEY).and_then(Value::as_str) != Some(SCHEMA_CONTEXT) {
        return ValidationResult::error(format!(
            "Schema must include @context with value \"{}\".",
            SCHEMA_CONTEXT
        ));
    }

    let type_value = document.get(TYPE_KEY);
    let has_type = match type_value {
        Some(Value::Array(types)) => !types.is_empty(),
        other => is_present(other),
    };
    if !has_type {
        return ValidationResult::error("Schema must include @type property.");
    }

    let graph = document.get(GRAPH_KEY);
    if is_present(graph) {
        let Some(Value::Array(items)) = graph else {
            return ValidationResult::error("@graph must be an array of schema objects.");
        };
        for item in items {
            let result = validate(item);
            if !result.is_ok() {
                return result;
            }
        }
        return ValidationResult::Ok;
    }

    let type_ = match type_value {
        Some(Value::String(type_)) => type_.as_str(),
        Some(Value::Array(types)) => match types.last() {
            Some(Value::String(type_)) => type_.as_str(),
            _ => {
                return ValidationResult::error("@type must be a string or an array of strings.")
            }
        },
        _ => return ValidationResult::error("@type must be a string or an array of strings."),
    };

    TypeRule::for_type(type_).check(type_, document)
}

/// Parse and validate raw manual schema text.
pub fn validate_text(text: &str) -> ValidationResult {
    match serde_json::from_str::<Value>(text) {
        Ok(document) => {
            let result = validate(&document);
            if let Some(message) = result.message() {
                tracing::debug!("Manual schema rejected: {}", message);
            }
            result
        }
        Err(e) => {
            tracing::debug!("Manual schema is not valid JSON: {}", e);
            ValidationResult::error(INVALID_JSON_MESSAGE)
        }
    }
}
