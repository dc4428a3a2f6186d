//! Handler-registry call shapes on top of [`SharedSchemaRegistry`].
//!
//! Callers written against the handler-based registry keep working during
//! migration: type listing, detection and processing go straight to the
//! definition registry, and handler registration/lookup warn and hand back a
//! [`DegradedSchemaHandler`] backed by the flat-schema validator.

use crate::definition::SchemaType;
use crate::error::SchemaError;
use crate::legacy::{self, LegacyVotingConfig, SchemaValidationResult};
use crate::registry::SharedSchemaRegistry;
use crate::runtime::{ProcessedProposalConfig, ProcessedSchema};
use serde_json::{Map, Value};
use tracing::warn;

/// The handler contract of the handler-based registry.
pub trait SchemaHandler: Send + Sync {
    fn schema_type(&self) -> &str;

    fn validate(&self, data: &Value) -> SchemaValidationResult;

    fn extract_voting_config(&self, data: &Value) -> Result<LegacyVotingConfig, SchemaError>;

    fn extract_proposal_config(&self, data: &Value) -> Result<ProcessedProposalConfig, SchemaError>;
}

/// Handler returned to deprecated call sites.
///
/// Validates and extracts flat process schemas; it has none of the custom
/// behaviour a registered handler may have had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedSchemaHandler {
    schema_type: String,
}

impl DegradedSchemaHandler {
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
        }
    }
}

impl SchemaHandler for DegradedSchemaHandler {
    fn schema_type(&self) -> &str {
        &self.schema_type
    }

    fn validate(&self, data: &Value) -> SchemaValidationResult {
        legacy::validate_schema_structure(data)
    }

    fn extract_voting_config(&self, data: &Value) -> Result<LegacyVotingConfig, SchemaError> {
        legacy::extract_voting_config(data)
    }

    fn extract_proposal_config(&self, data: &Value) -> Result<ProcessedProposalConfig, SchemaError> {
        legacy::extract_proposal_config(data)
    }
}

/// Old registry facade. Never panics and never returns an error for
/// deprecated calls.
#[derive(Debug, Clone)]
pub struct DeprecatedSchemaRegistry {
    registry: SharedSchemaRegistry,
}

impl DeprecatedSchemaRegistry {
    pub fn new(registry: SharedSchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SharedSchemaRegistry {
        &self.registry
    }

    /// Handlers are no longer registered; the handler is dropped.
    #[deprecated(note = "register a VotingSchemaDefinition with SchemaRegistry::register_schema")]
    pub fn register_handler(&self, handler: Box<dyn SchemaHandler>) -> DegradedSchemaHandler {
        warn!(
            "register_handler('{}') is deprecated and has no effect; register a voting schema definition instead",
            handler.schema_type()
        );
        DegradedSchemaHandler::new(handler.schema_type())
    }

    #[deprecated(note = "use SchemaRegistry::get_schema")]
    pub fn get_handler(&self, schema_type: &str) -> DegradedSchemaHandler {
        warn!(
            "get_handler('{}') is deprecated; returning a degraded handler",
            schema_type
        );
        DegradedSchemaHandler::new(schema_type)
    }

    #[deprecated(note = "use SchemaRegistry::get_schema_or_default")]
    pub fn get_handler_or_default(&self, schema_type: &str) -> DegradedSchemaHandler {
        let resolved = {
            let registry = self.registry.read();
            if registry.contains(schema_type) {
                schema_type.to_string()
            } else {
                registry.default_type().to_string()
            }
        };
        warn!(
            "get_handler_or_default('{}') is deprecated; returning a degraded '{}' handler",
            schema_type, resolved
        );
        DegradedSchemaHandler::new(resolved)
    }

    pub fn get_all_schema_types(&self) -> Vec<SchemaType> {
        self.registry.get_all_schema_types()
    }

    pub fn detect_schema_type(&self, data: &Value) -> SchemaType {
        self.registry.detect_schema_type(data)
    }

    pub fn process_schema(&self, form_data: &Map<String, Value>) -> ProcessedSchema {
        self.registry.process_schema(form_data)
    }
}
