use chrono::NaiveDate;

use crate::error::SchemaError;

pub const CREATED_DATE_TOKEN: &str = "{{fm_schema_created_date}}";
pub const LAST_UPDATED_DATE_TOKEN: &str = "{{fm_schema_last_updated_date}}";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dates available for substitution into manual schema text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDates {
    pub created: NaiveDate,
    pub modified: NaiveDate,
}

impl SchemaDates {
    pub fn new(created: NaiveDate, modified: NaiveDate) -> Self {
        Self { created, modified }
    }

    pub fn parse(created: &str, modified: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(parse_date(created)?, parse_date(modified)?))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, SchemaError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        SchemaError::Config(format!("Invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
    })
}

/// Replace the date placeholders in `text`.
///
/// This is plain text replacement done before parsing, so tokens may sit
/// anywhere in the document. Tokens that are not recognized are kept as-is.
pub fn substitute(text: &str, dates: &SchemaDates) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }

    let created = dates.created.format(DATE_FORMAT).to_string();
    let modified = dates.modified.format(DATE_FORMAT).to_string();
    tracing::debug!(
        "Substituting schema variables (created: {}, modified: {})",
        created,
        modified
    );

    text.replace(CREATED_DATE_TOKEN, &created)
        .replace(LAST_UPDATED_DATE_TOKEN, &modified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> SchemaDates {
        SchemaDates::parse("2024-03-05", "2024-11-20").unwrap()
    }

    #[test]
    fn test_created_date_substitution() {
        let text = r#"{"datePublished": "{{fm_schema_created_date}}", "x": 1}"#;
        assert_eq!(
            substitute(text, &dates()),
            r#"{"datePublished": "2024-03-05", "x": 1}"#
        );
    }

    #[test]
    fn test_both_tokens_and_repeats() {
        let text = "{{fm_schema_created_date}}/{{fm_schema_last_updated_date}}/{{fm_schema_created_date}}";
        assert_eq!(substitute(text, &dates()), "2024-03-05/2024-11-20/2024-03-05");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let text = r#"{"dateModified": "{{fm_schema_unknown}}"}"#;
        assert_eq!(substitute(text, &dates()), text);
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        assert!(SchemaDates::parse("05/03/2024", "2024-11-20").is_err());
        assert!(SchemaDates::parse("2024-02-30", "2024-11-20").is_err());
    }
}
