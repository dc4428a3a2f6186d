//! Error types for the decision schema engine.
//!
//! Validation outcomes are returned as values (`SchemaValidationResult`,
//! `VoteValidationResult`). `SchemaError` is reserved for operations that
//! cannot produce their output at all.

use crate::legacy::{SchemaValidationResult, INVALID_SCHEMA_TYPE};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Invalid decision process schema: {}", .errors.join("; "))]
    InvalidSchema { errors: Vec<String> },

    #[error("Process definition must contain at least one phase")]
    EmptyPhases,

    #[error("Duplicate phase id: '{0}'")]
    DuplicatePhaseId(String),

    #[error("Unknown phase: '{0}'")]
    UnknownPhase(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SchemaError {
    pub fn invalid(error: impl Into<String>) -> Self {
        Self::InvalidSchema {
            errors: vec![error.into()],
        }
    }

    /// Render this error as the short-circuit validation result returned to
    /// API callers for malformed schema data.
    pub fn to_validation_result(&self) -> SchemaValidationResult {
        let errors = match self {
            SchemaError::InvalidSchema { errors } => errors.clone(),
            other => vec![other.to_string()],
        };
        SchemaValidationResult {
            is_valid: false,
            schema_type: INVALID_SCHEMA_TYPE.to_string(),
            errors,
            supported_properties: Vec::new(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_schema_message_joins_errors() {
        let err = SchemaError::InvalidSchema {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid decision process schema: a; b");
    }

    #[test]
    fn test_to_validation_result() {
        let result = SchemaError::EmptyPhases.to_validation_result();
        assert!(!result.is_valid);
        assert_eq!(result.schema_type, "invalid");
        assert_eq!(result.errors.len(), 1);
        assert!(result.supported_properties.is_empty());
    }
}
