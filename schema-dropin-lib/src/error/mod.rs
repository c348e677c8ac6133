use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed schema document: {0}")]
    MalformedDocument(String),
    #[error("Schema validation failed: {0}")]
    Validation(String),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SchemaError {
    /// Errors that mean "treat the manual schema as absent" at render time.
    pub fn is_unusable_document(&self) -> bool {
        matches!(self, SchemaError::Json(_) | SchemaError::MalformedDocument(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Error(String),
}

impl ValidationResult {
    pub fn error(message: impl Into<String>) -> Self {
        ValidationResult::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Ok => None,
            ValidationResult::Error(message) => Some(message),
        }
    }

    pub fn into_result(self) -> Result<(), SchemaError> {
        match self {
            ValidationResult::Ok => Ok(()),
            ValidationResult::Error(message) => Err(SchemaError::Validation(message)),
        }
    }
}
