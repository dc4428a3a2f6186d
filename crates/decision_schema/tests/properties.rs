//! Property tests for ordering, merging, selection and signature invariants.

use decision_schema::{
    binding::{apply_bindings, merge_with_defaults},
    compile_rubric_schema,
    legacy::{create_schema_signature, validate_vote_selection},
    FieldBinding, VotingSchemaDefinition,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

fn rubric_template(properties: &[String], order: &[String]) -> Value {
    let mut props = Map::new();
    for key in properties {
        props.insert(key.clone(), json!({"type": "integer"}));
    }
    json!({"properties": props, "x-field-order": order})
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every property appears exactly once; ordered keys lead, in order.
    #[test]
    fn test_rubric_keys_unique_and_ordered(
        properties in proptest::collection::vec("[a-e]{1,2}", 0..12),
        order in proptest::collection::vec("[a-f]{1,2}", 0..8),
    ) {
        let template = rubric_template(&properties, &order);
        let fields = compile_rubric_schema(&template);
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();

        let declared: HashSet<&str> = properties.iter().map(String::as_str).collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(unique.len(), keys.len());
        prop_assert_eq!(&unique, &declared);

        let mut expected_prefix: Vec<&str> = Vec::new();
        for key in &order {
            if declared.contains(key.as_str()) && !expected_prefix.contains(&key.as_str()) {
                expected_prefix.push(key.as_str());
            }
        }
        prop_assert_eq!(&keys[..expected_prefix.len()], &expected_prefix[..]);
    }

    /// Form values always win over definition defaults.
    #[test]
    fn test_merge_form_precedence(form_value in 0u64..1000, default_value in 0u64..1000) {
        let schema = VotingSchemaDefinition::new("simple", "Simple")
            .with_default("maxVotesPerMember", json!(default_value));
        let mut form = Map::new();
        form.insert("maxVotesPerMember".to_string(), json!(form_value));

        let merged = merge_with_defaults(&form, &schema);
        prop_assert_eq!(merged.get("maxVotesPerMember"), Some(&json!(form_value)));
    }

    /// Non-direct bindings never write.
    #[test]
    fn test_special_bindings_never_written(transform in "[a-z]{3,10}", value in any::<i64>()) {
        prop_assume!(transform != "direct");
        let schema = VotingSchemaDefinition::new("custom", "Custom")
            .with_binding("field", FieldBinding::with_transform("out.field", transform));
        let mut form = Map::new();
        form.insert("field".to_string(), json!(value));

        prop_assert!(apply_bindings(&form, &schema).is_empty());
    }

    /// Unrelated top-level keys never change the signature.
    #[test]
    fn test_signature_ignores_extra_keys(
        allow_proposals in any::<bool>(),
        allow_decisions in any::<bool>(),
        cap in 0u64..100,
        extra_key in "[a-z]{1,8}",
        extra_value in any::<i32>(),
    ) {
        prop_assume!(!["allowProposals", "allowDecisions", "instanceData"].contains(&extra_key.as_str()));
        let base = json!({
            "allowProposals": allow_proposals,
            "allowDecisions": allow_decisions,
            "instanceData": {"maxVotesPerElector": cap}
        });
        let mut extended = base.clone();
        extended[extra_key.as_str()] = json!(extra_value);

        prop_assert_eq!(create_schema_signature(&base), create_schema_signature(&extended));
    }

    /// Validity means no errors, and duplicates are always reported.
    #[test]
    fn test_vote_selection_consistency(
        selected in proptest::collection::vec("[a-d]", 0..6),
        max_votes in 0u64..6,
    ) {
        let available = vec!["a", "b", "c"];
        let selected: Vec<&str> = selected.iter().map(String::as_str).collect();
        let result = validate_vote_selection(&selected, max_votes, &available);

        prop_assert_eq!(result.is_valid, result.errors.is_empty());
        let unique: HashSet<&str> = selected.iter().copied().collect();
        if unique.len() != selected.len() {
            prop_assert!(result.errors.iter().any(|e| e.contains("Duplicate")));
        }
        if selected.is_empty() {
            prop_assert!(!result.is_valid);
        }
    }
}
