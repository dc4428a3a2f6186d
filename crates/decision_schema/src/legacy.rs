//! Validation and extraction for flat (pre-phase) decision process schemas.
//!
//! Stored process rows that predate voting schema definitions look like:
//!
//! ```json
//! {
//!   "schemaType": "advanced",
//!   "allowProposals": true,
//!   "allowDecisions": true,
//!   "instanceData": { "maxVotesPerElector": 3 },
//!   "advancedVotingConfig": { "weighting": "budget" }
//! }
//! ```
//!
//! Unknown top-level keys are preserved and surfaced as `additional_config`.
//! The vote cap is read from `instanceData.maxVotesPerElector`, falling back
//! to the older `instanceData.maxVotesPerMember`; both names are kept as
//! stored.

use crate::definition::{SchemaType, ADVANCED_SCHEMA_TYPE};
use crate::error::SchemaError;
use crate::path::get_value_by_path;
use crate::runtime::{FieldConstraint, ProcessedProposalConfig};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::warn;

pub const INVALID_SCHEMA_TYPE: &str = "invalid";
pub const UNKNOWN_SCHEMA_TYPE: &str = "unknown";

const ADVANCED_VOTING_KEY: &str = "advancedVotingConfig";
const ADVANCED_PROPOSAL_KEY: &str = "advancedProposalConfig";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaValidationResult {
    pub is_valid: bool,
    pub schema_type: String,
    pub errors: Vec<String>,
    /// Top-level keys carried by the validated schema
    pub supported_properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_votes_per_elector: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_votes_per_member: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstanceData {
    pub fn vote_cap(&self) -> Option<u64> {
        self.max_votes_per_elector.or(self.max_votes_per_member)
    }
}

/// The flat runtime schema stored on legacy process rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionProcessSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    pub allow_proposals: bool,
    pub allow_decisions: bool,
    pub instance_data: InstanceData,
    /// Unrecognised top-level keys, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DecisionProcessSchema {
    /// Parse and check the base shape: boolean toggles plus a non-negative
    /// integer vote cap.
    pub fn parse(data: &Value) -> Result<Self, SchemaError> {
        if !data.is_object() {
            return Err(SchemaError::invalid("Schema must be an object"));
        }
        let schema: DecisionProcessSchema =
            serde_json::from_value(data.clone()).map_err(|e| SchemaError::invalid(e.to_string()))?;
        if schema.instance_data.vote_cap().is_none() {
            return Err(SchemaError::invalid(
                "instanceData.maxVotesPerElector must be a non-negative integer",
            ));
        }
        Ok(schema)
    }

    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
            .as_deref()
            .map(SchemaType::from)
            .unwrap_or(SchemaType::Simple)
    }

    pub fn is_advanced(&self) -> bool {
        self.schema_type.as_deref() == Some(ADVANCED_SCHEMA_TYPE)
    }

    fn advanced_section(&self, key: &str) -> Option<&Map<String, Value>> {
        if !self.is_advanced() {
            return None;
        }
        self.extra.get(key).and_then(Value::as_object)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyVotingConfig {
    pub schema_type: SchemaType,
    pub allow_proposals: bool,
    pub allow_decisions: bool,
    pub max_votes_per_elector: u64,
    pub additional_config: Map<String, Value>,
}

pub fn is_valid_decision_process_schema(data: &Value) -> bool {
    DecisionProcessSchema::parse(data).is_ok()
}

/// Structural validation against the base schema shape.
pub fn validate_schema_structure(data: &Value) -> SchemaValidationResult {
    match DecisionProcessSchema::parse(data) {
        Ok(schema) => SchemaValidationResult {
            is_valid: true,
            schema_type: schema
                .schema_type
                .unwrap_or_else(|| UNKNOWN_SCHEMA_TYPE.to_string()),
            errors: Vec::new(),
            supported_properties: top_level_keys(data),
        },
        Err(err) => err.to_validation_result(),
    }
}

pub fn extract_voting_config(data: &Value) -> Result<LegacyVotingConfig, SchemaError> {
    let schema = DecisionProcessSchema::parse(data)?;
    let advanced = schema.advanced_section(ADVANCED_VOTING_KEY).cloned();

    let mut additional_config: Map<String, Value> = schema
        .extra
        .iter()
        .filter(|(key, _)| {
            !(schema.is_advanced() && (*key == ADVANCED_VOTING_KEY || *key == ADVANCED_PROPOSAL_KEY))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if let Some(overlay) = advanced {
        additional_config.extend(overlay);
    }

    Ok(LegacyVotingConfig {
        schema_type: schema.schema_type(),
        allow_proposals: schema.allow_proposals,
        allow_decisions: schema.allow_decisions,
        // parse() guarantees a cap
        max_votes_per_elector: schema.instance_data.vote_cap().unwrap_or_default(),
        additional_config,
    })
}

pub fn extract_proposal_config(data: &Value) -> Result<ProcessedProposalConfig, SchemaError> {
    let schema = DecisionProcessSchema::parse(data)?;
    let mut config = ProcessedProposalConfig::standard(schema.schema_type(), schema.allow_proposals);

    if let Some(overlay) = schema.advanced_section(ADVANCED_PROPOSAL_KEY) {
        union_fields(&mut config.required_fields, overlay.get("requiredFields"));
        union_fields(&mut config.optional_fields, overlay.get("optionalFields"));

        if let Some(constraints) = overlay.get("fieldConstraints").and_then(Value::as_object) {
            for (field, raw) in constraints {
                match serde_json::from_value::<FieldConstraint>(raw.clone()) {
                    Ok(constraint) => {
                        config.field_constraints.insert(field.clone(), constraint);
                    }
                    Err(e) => warn!("Ignoring malformed constraint for '{}': {}", field, e),
                }
            }
        }
    }

    Ok(config)
}

fn union_fields(fields: &mut Vec<String>, extra: Option<&Value>) {
    let Some(extra) = extra.and_then(Value::as_array) else {
        return;
    };
    for name in extra.iter().filter_map(Value::as_str) {
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check a ballot, collecting every problem rather than stopping at the first.
pub fn validate_vote_selection<S: AsRef<str>, A: AsRef<str>>(
    selected_ids: &[S],
    max_votes: u64,
    available_ids: &[A],
) -> VoteValidationResult {
    let mut errors = Vec::new();

    if selected_ids.is_empty() {
        errors.push("Please select at least one proposal".to_string());
    }

    if selected_ids.len() as u64 > max_votes {
        errors.push(format!(
            "You can select at most {} proposals, but {} were selected",
            max_votes,
            selected_ids.len()
        ));
    }

    let available: HashSet<&str> = available_ids.iter().map(|id| id.as_ref()).collect();
    let mut invalid: Vec<&str> = Vec::new();
    for id in selected_ids {
        let id: &str = id.as_ref();
        if !available.contains(id) && !invalid.contains(&id) {
            invalid.push(id);
        }
    }
    if !invalid.is_empty() {
        errors.push(format!("Invalid proposal selection: {}", invalid.join(", ")));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    if !selected_ids.iter().all(|id| seen.insert(id.as_ref())) {
        errors.push("Duplicate proposal selections are not allowed".to_string());
    }

    VoteValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Fingerprint of the fields that decide voting behaviour.
///
/// Base64 of the JSON object `{allowProposals, allowDecisions,
/// maxVotesPerElector}`; missing values encode as `null` and every other key
/// is ignored.
pub fn create_schema_signature(schema: &Value) -> String {
    let cap = get_value_by_path(schema, "instanceData.maxVotesPerElector")
        .or_else(|| get_value_by_path(schema, "instanceData.maxVotesPerMember"));
    let normalized = json!({
        "allowProposals": schema.get("allowProposals").cloned().unwrap_or(Value::Null),
        "allowDecisions": schema.get("allowDecisions").cloned().unwrap_or(Value::Null),
        "maxVotesPerElector": cap.cloned().unwrap_or(Value::Null),
    });
    general_purpose::STANDARD.encode(normalized.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub is_compatible: bool,
    pub missing_properties: Vec<String>,
}

/// Which of `required_properties` are missing as top-level keys.
pub fn validate_schema_compatibility<S: AsRef<str>>(
    schema: &Value,
    required_properties: &[S],
) -> CompatibilityReport {
    let missing_properties: Vec<String> = required_properties
        .iter()
        .map(|prop| prop.as_ref().to_string())
        .filter(|prop| schema.get(prop.as_str()).is_none())
        .collect();
    CompatibilityReport {
        is_compatible: missing_properties.is_empty(),
        missing_properties,
    }
}

fn top_level_keys(data: &Value) -> Vec<String> {
    data.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_schema() -> Value {
        json!({
            "allowProposals": true,
            "allowDecisions": false,
            "instanceData": {"maxVotesPerElector": 3, "budget": 5000},
            "region": "north"
        })
    }

    #[test]
    fn test_type_guard() {
        assert!(is_valid_decision_process_schema(&stored_schema()));
        assert!(is_valid_decision_process_schema(&json!({
            "allowProposals": true,
            "allowDecisions": true,
            "instanceData": {"maxVotesPerMember": 0}
        })));

        assert!(!is_valid_decision_process_schema(&json!("schema")));
        assert!(!is_valid_decision_process_schema(&json!({
            "allowProposals": "yes",
            "allowDecisions": true,
            "instanceData": {"maxVotesPerElector": 3}
        })));
        assert!(!is_valid_decision_process_schema(&json!({
            "allowProposals": true,
            "allowDecisions": true,
            "instanceData": {"maxVotesPerElector": -1}
        })));
        assert!(!is_valid_decision_process_schema(&json!({
            "allowProposals": true,
            "allowDecisions": true,
            "instanceData": {"maxVotesPerElector": 2.5}
        })));
        assert!(!is_valid_decision_process_schema(&json!({
            "allowProposals": true,
            "allowDecisions": true,
            "instanceData": {}
        })));
    }

    #[test]
    fn test_validate_structure_success() {
        let mut data = stored_schema();
        data["schemaType"] = json!("simple");
        let result = validate_schema_structure(&data);
        assert!(result.is_valid);
        assert_eq!(result.schema_type, "simple");
        assert!(result.errors.is_empty());
        assert!(result.supported_properties.contains(&"region".to_string()));
        assert_eq!(result.supported_properties.len(), 5);
    }

    #[test]
    fn test_validate_structure_untagged_is_unknown() {
        assert_eq!(validate_schema_structure(&stored_schema()).schema_type, "unknown");
    }

    #[test]
    fn test_validate_structure_failure() {
        let result = validate_schema_structure(&json!({"allowProposals": true}));
        assert!(!result.is_valid);
        assert_eq!(result.schema_type, "invalid");
        assert_eq!(result.errors.len(), 1);
        assert!(result.supported_properties.is_empty());
    }

    #[test]
    fn test_extract_voting_config_keeps_unknown_keys() {
        let config = extract_voting_config(&stored_schema()).unwrap();
        assert_eq!(config.schema_type, SchemaType::Simple);
        assert!(config.allow_proposals);
        assert!(!config.allow_decisions);
        assert_eq!(config.max_votes_per_elector, 3);
        assert_eq!(config.additional_config.get("region"), Some(&json!("north")));
        assert!(!config.additional_config.contains_key("instanceData"));
    }

    #[test]
    fn test_extract_voting_config_advanced_overlay() {
        let mut data = stored_schema();
        data["schemaType"] = json!("advanced");
        data["advancedVotingConfig"] = json!({"weighting": "budget", "region": "south"});

        let config = extract_voting_config(&data).unwrap();
        assert_eq!(config.schema_type, SchemaType::Advanced);
        assert_eq!(config.additional_config.get("weighting"), Some(&json!("budget")));
        assert_eq!(config.additional_config.get("region"), Some(&json!("south")));
        assert!(!config.additional_config.contains_key("advancedVotingConfig"));
    }

    #[test]
    fn test_advanced_section_ignored_for_other_types() {
        let mut data = stored_schema();
        data["advancedVotingConfig"] = json!({"weighting": "budget"});
        let config = extract_voting_config(&data).unwrap();
        assert!(!config.additional_config.contains_key("weighting"));
        assert!(config.additional_config.contains_key("advancedVotingConfig"));
    }

    #[test]
    fn test_extract_malformed_short_circuits() {
        let err = extract_voting_config(&json!({"allowProposals": true})).unwrap_err();
        let result = err.to_validation_result();
        assert!(!result.is_valid);
        assert_eq!(result.schema_type, "invalid");
        assert!(extract_proposal_config(&json!(42)).is_err());
    }

    #[test]
    fn test_extract_proposal_config_advanced_union() {
        let mut data = stored_schema();
        data["schemaType"] = json!("advanced");
        data["advancedProposalConfig"] = json!({
            "requiredFields": ["title", "budget"],
            "optionalFields": ["category", "attachments", "attachments"],
            "fieldConstraints": {
                "title": {"type": "string", "minLength": 5, "maxLength": 120},
                "budget": {"type": "number", "min": 100.0},
                "broken": "not a constraint"
            }
        });

        let config = extract_proposal_config(&data).unwrap();
        assert_eq!(config.required_fields, vec!["title", "description", "budget"]);
        assert_eq!(
            config.optional_fields,
            vec!["amount", "category", "schemaSpecificData", "attachments"]
        );
        assert_eq!(config.field_constraints["title"].max_length, Some(120));
        assert_eq!(config.field_constraints["budget"].min, Some(100.0));
        assert_eq!(config.field_constraints["description"].max_length, Some(5000));
        assert!(!config.field_constraints.contains_key("broken"));
    }

    #[test]
    fn test_vote_selection_empty() {
        let none: [&str; 0] = [];
        let result = validate_vote_selection(&none, 3, &["a", "b"]);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("at least one proposal")));
    }

    #[test]
    fn test_vote_selection_duplicate() {
        let result = validate_vote_selection(&["a", "a"], 3, &["a", "b"]);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Duplicate proposal selections are not allowed"]);
    }

    #[test]
    fn test_vote_selection_accumulates_errors() {
        let result = validate_vote_selection(&["a", "x", "x", "y"], 2, &["a", "b"]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].contains("at most 2"));
        assert_eq!(result.errors[1], "Invalid proposal selection: x, y");
        assert!(result.errors[2].contains("Duplicate"));
    }

    #[test]
    fn test_vote_selection_owned_against_borrowed_ids() {
        let selected: Vec<String> = vec!["a".to_string(), "z".to_string()];
        let result = validate_vote_selection(&selected, 2, &["a", "b"]);
        assert_eq!(result.errors, vec!["Invalid proposal selection: z"]);
    }

    #[test]
    fn test_vote_selection_valid() {
        let result = validate_vote_selection(&["a", "b"], 2, &["a", "b", "c"]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_signature_ignores_unrelated_keys() {
        let mut other = stored_schema();
        other["region"] = json!("south");
        other["notes"] = json!("extra");
        assert_eq!(create_schema_signature(&stored_schema()), create_schema_signature(&other));
    }

    #[test]
    fn test_signature_changes_with_cap() {
        let mut other = stored_schema();
        other["instanceData"]["maxVotesPerElector"] = json!(4);
        assert_ne!(create_schema_signature(&stored_schema()), create_schema_signature(&other));
    }

    #[test]
    fn test_signature_decodes_to_normalized_json() {
        let signature = create_schema_signature(&stored_schema());
        let decoded = general_purpose::STANDARD.decode(signature).unwrap();
        let value: Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(
            value,
            json!({"allowProposals": true, "allowDecisions": false, "maxVotesPerElector": 3})
        );
    }

    #[test]
    fn test_compatibility() {
        let report = validate_schema_compatibility(&stored_schema(), &["allowProposals", "phases", "region"]);
        assert!(!report.is_compatible);
        assert_eq!(report.missing_properties, vec!["phases"]);

        let report = validate_schema_compatibility::<&str>(&stored_schema(), &[]);
        assert!(report.is_compatible);
    }
}
