//! Runtime configuration derived from a form submission and its definition.
//!
//! These snapshots are recomputed on every call and never persisted by the
//! engine. Field-level validation is assumed to have happened upstream.

use crate::binding::merge_with_defaults;
use crate::definition::{SchemaType, VotingSchemaDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_MAX_VOTES_PER_MEMBER: u64 = 3;

pub const REQUIRED_PROPOSAL_FIELDS: [&str; 2] = ["title", "description"];
pub const OPTIONAL_PROPOSAL_FIELDS: [&str; 3] = ["amount", "category", "schemaSpecificData"];

const VOTING_KEYS: [&str; 3] = ["allowProposals", "allowDecisions", "maxVotesPerMember"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedVotingConfig {
    pub schema_type: SchemaType,
    pub allow_proposals: bool,
    pub allow_decisions: bool,
    pub max_votes_per_member: u64,
    /// Every merged key that is not one of the fields above, plus a
    /// `maxVotesPerMember` that could not be read as a non-negative integer
    pub additional_config: Map<String, Value>,
}

/// Constraint on one proposal field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraint {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldConstraint {
    pub fn string() -> Self {
        Self {
            field_type: "string".to_string(),
            ..Self::default()
        }
    }

    pub fn number() -> Self {
        Self {
            field_type: "number".to_string(),
            ..Self::default()
        }
    }

    pub fn with_length(mut self, min: u64, max: u64) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }
}

/// Constraints shared by every schema type.
pub fn default_field_constraints() -> BTreeMap<String, FieldConstraint> {
    BTreeMap::from([
        ("title".to_string(), FieldConstraint::string().with_length(1, 200)),
        ("description".to_string(), FieldConstraint::string().with_length(1, 5000)),
        ("amount".to_string(), FieldConstraint::number().with_min(0.0)),
        ("category".to_string(), FieldConstraint::string()),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedProposalConfig {
    pub schema_type: SchemaType,
    pub allow_proposals: bool,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub field_constraints: BTreeMap<String, FieldConstraint>,
}

impl ProcessedProposalConfig {
    /// The fixed proposal field layout for `schema_type`.
    pub fn standard(schema_type: SchemaType, allow_proposals: bool) -> Self {
        Self {
            schema_type,
            allow_proposals,
            required_fields: REQUIRED_PROPOSAL_FIELDS.iter().map(|f| f.to_string()).collect(),
            optional_fields: OPTIONAL_PROPOSAL_FIELDS.iter().map(|f| f.to_string()).collect(),
            field_constraints: default_field_constraints(),
        }
    }
}

/// Voting and proposal configuration for one form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSchema {
    pub schema_type: SchemaType,
    pub voting_config: ProcessedVotingConfig,
    pub proposal_config: ProcessedProposalConfig,
    pub is_valid: bool,
}

pub fn extract_voting_config(
    form_data: &Map<String, Value>,
    schema: &VotingSchemaDefinition,
) -> ProcessedVotingConfig {
    let merged = merge_with_defaults(form_data, schema);

    let mut additional_config: Map<String, Value> = merged
        .iter()
        .filter(|(key, _)| !VOTING_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let max_votes_per_member = match merged.get("maxVotesPerMember") {
        Some(value) => match value.as_u64() {
            Some(cap) => cap,
            None => {
                warn!(
                    "Ignoring non-integer maxVotesPerMember {} for schema '{}', using {}",
                    value, schema.schema_type, DEFAULT_MAX_VOTES_PER_MEMBER
                );
                additional_config.insert("maxVotesPerMember".to_string(), value.clone());
                DEFAULT_MAX_VOTES_PER_MEMBER
            }
        },
        None => DEFAULT_MAX_VOTES_PER_MEMBER,
    };

    ProcessedVotingConfig {
        schema_type: schema.schema_type.clone(),
        allow_proposals: bool_or(&merged, "allowProposals", true),
        allow_decisions: bool_or(&merged, "allowDecisions", true),
        max_votes_per_member,
        additional_config,
    }
}

pub fn extract_proposal_config(
    form_data: &Map<String, Value>,
    schema: &VotingSchemaDefinition,
) -> ProcessedProposalConfig {
    let merged = merge_with_defaults(form_data, schema);
    ProcessedProposalConfig::standard(
        schema.schema_type.clone(),
        bool_or(&merged, "allowProposals", true),
    )
}

/// Both extractors in one result. Always valid: callers validate the form
/// before it reaches the engine.
pub fn process_with_schema(form_data: &Map<String, Value>, schema: &VotingSchemaDefinition) -> ProcessedSchema {
    ProcessedSchema {
        schema_type: schema.schema_type.clone(),
        voting_config: extract_voting_config(form_data, schema),
        proposal_config: extract_proposal_config(form_data, schema),
        is_valid: true,
    }
}

pub(crate) fn bool_or(map: &Map<String, Value>, key: &str, default: bool) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(default)
}
