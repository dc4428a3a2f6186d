//! Engine configuration.
//!
//! Every field has a default, so an empty document yields the built-in
//! engine. Binaries parse this from TOML; the engine itself never reads files.

use crate::definition::{SchemaType, VotingSchemaDefinition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Definition used when detection finds no match
    pub default_schema_type: SchemaType,

    /// Register the built-in `simple` and `advanced` definitions first
    pub include_builtins: bool,

    /// Extra definitions, registered in order after the built-ins
    pub definitions: Vec<VotingSchemaDefinition>,

    pub compiler: CompilerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_schema_type: SchemaType::Simple,
            include_builtins: true,
            definitions: Vec::new(),
            compiler: CompilerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Proposal fields whose absence is reported during compilation
    pub required_system_fields: Vec<String>,

    /// Proposal fields flagged `is_system` in compiled descriptors
    pub system_fields: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            required_system_fields: vec!["title".to_string()],
            system_fields: vec![
                "title".to_string(),
                "category".to_string(),
                "budget".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_is_default() {
        let config: EngineConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.compiler.required_system_fields, vec!["title"]);
    }

    #[test]
    fn test_partial_compiler_section() {
        let config: EngineConfig = serde_json::from_value(json!({
            "default_schema_type": "advanced",
            "compiler": {"required_system_fields": ["title", "budget"]}
        }))
        .unwrap();
        assert_eq!(config.default_schema_type, SchemaType::Advanced);
        assert_eq!(config.compiler.required_system_fields, vec!["title", "budget"]);
        assert_eq!(config.compiler.system_fields.len(), 3);
    }
}
