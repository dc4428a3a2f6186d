//! Built-in voting schema definitions.

use crate::definition::{FieldBinding, SchemaType, VotingSchemaDefinition};
use serde_json::json;

/// Definitions every registry starts with, in registration order.
pub fn builtin_definitions() -> Vec<VotingSchemaDefinition> {
    vec![simple_voting(), advanced_voting()]
}

/// One vote cap, proposals and decisions toggles.
pub fn simple_voting() -> VotingSchemaDefinition {
    VotingSchemaDefinition::new(SchemaType::Simple, "Simple Voting")
        .with_description("Members vote for up to a fixed number of proposals")
        .with_form_schema(json!({
            "type": "object",
            "properties": {
                "allowProposals": {"type": "boolean", "title": "Allow proposals"},
                "allowDecisions": {"type": "boolean", "title": "Allow decisions"},
                "maxVotesPerMember": {
                    "type": "integer",
                    "minimum": 0,
                    "title": "Maximum votes per member"
                }
            },
            "required": ["maxVotesPerMember"]
        }))
        .with_ui_schema(json!({
            "ui:order": ["maxVotesPerMember", "allowProposals", "allowDecisions"]
        }))
        .with_default("allowProposals", json!(true))
        .with_default("allowDecisions", json!(true))
        .with_default("maxVotesPerMember", json!(3))
        .with_binding("allowProposals", FieldBinding::direct("allowProposals"))
        .with_binding("allowDecisions", FieldBinding::direct("allowDecisions"))
        .with_binding(
            "maxVotesPerMember",
            FieldBinding::direct("instanceData.maxVotesPerMember"),
        )
}

/// Adds a budget, weighted voting and phase-based scheduling.
///
/// `phases` uses the `phaseList` transform: turning the form's phase rows
/// into `PhaseDefinition`s is left to the caller.
pub fn advanced_voting() -> VotingSchemaDefinition {
    VotingSchemaDefinition::new(SchemaType::Advanced, "Advanced Voting")
        .with_description("Budgeted, weighted voting across scheduled phases")
        .with_form_schema(json!({
            "type": "object",
            "properties": {
                "allowProposals": {"type": "boolean"},
                "allowDecisions": {"type": "boolean"},
                "maxVotesPerMember": {"type": "integer", "minimum": 0},
                "budget": {"type": "number", "minimum": 0},
                "votingMethod": {"type": "string", "enum": ["approval", "weighted", "ranked"]},
                "allowVoteChanges": {"type": "boolean"},
                "phases": {"type": "array", "items": {"type": "object"}}
            },
            "required": ["maxVotesPerMember", "votingMethod"]
        }))
        .with_ui_schema(json!({
            "budget": {"ui:widget": "money"},
            "phases": {"ui:widget": "phase-editor"}
        }))
        .with_default("allowProposals", json!(true))
        .with_default("allowDecisions", json!(true))
        .with_default("maxVotesPerMember", json!(5))
        .with_default("votingMethod", json!("approval"))
        .with_default("allowVoteChanges", json!(false))
        .with_binding("allowProposals", FieldBinding::direct("allowProposals"))
        .with_binding("allowDecisions", FieldBinding::direct("allowDecisions"))
        .with_binding(
            "maxVotesPerMember",
            FieldBinding::direct("instanceData.maxVotesPerMember"),
        )
        .with_binding("budget", FieldBinding::direct("instanceData.budget"))
        .with_binding(
            "votingMethod",
            FieldBinding::direct("advancedVotingConfig.votingMethod"),
        )
        .with_binding(
            "allowVoteChanges",
            FieldBinding::with_transform("advancedVotingConfig.allowVoteChanges", "direct"),
        )
        .with_binding(
            "phases",
            FieldBinding::with_transform("instanceData.phases", "phaseList"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::get_special_bindings;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_types_unique() {
        let defs = builtin_definitions();
        let types: HashSet<_> = defs.iter().map(|d| d.schema_type.clone()).collect();
        assert_eq!(types.len(), defs.len());
    }

    #[test]
    fn test_advanced_has_one_special_binding() {
        let advanced = advanced_voting();
        let special = get_special_bindings(&advanced);
        assert_eq!(special.keys().copied().collect::<Vec<_>>(), vec!["phases"]);
    }

    #[test]
    fn test_simple_defaults() {
        let simple = simple_voting();
        assert_eq!(simple.defaults["maxVotesPerMember"], 3);
        assert!(get_special_bindings(&simple).is_empty());
    }
}
