//! Field bindings: moving submitted form values into process-schema shape.

use crate::definition::{FieldBinding, VotingSchemaDefinition};
use crate::path::set_value_by_path;
use serde_json::{Map, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Write `value` at the binding's target. Non-direct transforms are skipped.
pub fn apply_binding(
    result: &mut Map<String, Value>,
    field_name: &str,
    value: &Value,
    binding: &FieldBinding,
) {
    if !binding.is_direct() {
        debug!(
            "Skipping field '{}': transform '{}' is handled by the caller",
            field_name,
            binding.transform.as_ref().map(|t| t.as_str()).unwrap_or_default()
        );
        return;
    }
    set_value_by_path(result, &binding.target, value.clone());
}

/// Apply every binding whose field is present in `form_data`, in declaration
/// order. Absent fields are skipped; an explicit `null` is written through.
/// Returns a fresh object.
pub fn apply_bindings(form_data: &Map<String, Value>, schema: &VotingSchemaDefinition) -> Map<String, Value> {
    let mut result = Map::new();
    for (field_name, binding) in &schema.bindings {
        if let Some(value) = form_data.get(field_name) {
            apply_binding(&mut result, field_name, value, binding);
        }
    }
    result
}

/// Bindings with a non-direct transform, left for caller-side handling.
pub fn get_special_bindings(schema: &VotingSchemaDefinition) -> IndexMap<&str, &FieldBinding> {
    schema
        .bindings
        .iter()
        .filter(|(_, binding)| !binding.is_direct())
        .map(|(name, binding)| (name.as_str(), binding))
        .collect()
}

/// Shallow merge; form values win over schema defaults.
pub fn merge_with_defaults(form_data: &Map<String, Value>, schema: &VotingSchemaDefinition) -> Map<String, Value> {
    let mut merged = schema.defaults.clone();
    for (key, value) in form_data {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// `true` when `data` is an object tagged with the definition's schema type.
pub fn matches_schema_type(data: &Value, schema: &VotingSchemaDefinition) -> bool {
    data.as_object()
        .and_then(|map| map.get("schemaType"))
        .and_then(Value::as_str)
        .is_some_and(|tag| schema.schema_type == tag)
}
