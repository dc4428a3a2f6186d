//! Dot-path access over untyped JSON data.
//!
//! Paths are split on `.`; `"instanceData.maxVotesPerMember"` addresses
//! `{"instanceData": {"maxVotesPerMember": ...}}`.

use serde_json::{Map, Value};
use tracing::debug;

/// Read the value at `path`, or `None` as soon as a segment cannot be
/// traversed. Array segments are addressed by index (`"options.0.id"`).
pub fn get_value_by_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating empty objects for missing intermediate
/// segments. Mutates `target` in place.
///
/// Returns `false` without writing when an existing intermediate value is not
/// an object; existing data is never replaced to make room for the path.
pub fn set_value_by_path(target: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = target;
    for segment in parents {
        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(map) => current = map,
            other => {
                debug!(
                    "Cannot write '{}': segment '{}' holds a non-object value ({})",
                    path,
                    segment,
                    value_kind(other)
                );
                return false;
            }
        }
    }

    current.insert(last.to_string(), value);
    true
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested_value() {
        let data = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get_value_by_path(&data, "a.b.c"), Some(&json!(42)));
        assert_eq!(get_value_by_path(&data, "a.b"), Some(&json!({"c": 42})));
    }

    #[test]
    fn test_get_missing_or_untraversable() {
        let data = json!({"a": {"b": 1}, "s": "text"});
        assert_eq!(get_value_by_path(&data, "a.x.c"), None);
        assert_eq!(get_value_by_path(&data, "a.b.c"), None);
        assert_eq!(get_value_by_path(&data, "s.len"), None);
        assert_eq!(get_value_by_path(&json!(null), "a"), None);
    }

    #[test]
    fn test_get_array_index() {
        let data = json!({"options": [{"id": "x"}, {"id": "y"}]});
        assert_eq!(get_value_by_path(&data, "options.1.id"), Some(&json!("y")));
        assert_eq!(get_value_by_path(&data, "options.5.id"), None);
        assert_eq!(get_value_by_path(&data, "options.first"), None);
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut target = Map::new();
        assert!(set_value_by_path(&mut target, "instanceData.voting.max", json!(5)));
        assert_eq!(Value::Object(target), json!({"instanceData": {"voting": {"max": 5}}}));
    }

    #[test]
    fn test_set_preserves_siblings() {
        let mut target = json!({"instanceData": {"budget": 100}})
            .as_object()
            .cloned()
            .unwrap();
        set_value_by_path(&mut target, "instanceData.maxVotesPerMember", json!(3));
        assert_eq!(
            Value::Object(target),
            json!({"instanceData": {"budget": 100, "maxVotesPerMember": 3}})
        );
    }

    #[test]
    fn test_set_top_level_overwrites() {
        let mut target = json!({"allowProposals": true}).as_object().cloned().unwrap();
        set_value_by_path(&mut target, "allowProposals", json!(false));
        assert_eq!(target.get("allowProposals"), Some(&json!(false)));
    }

    #[test]
    fn test_set_refuses_non_object_intermediate() {
        let mut target = json!({"instanceData": 7}).as_object().cloned().unwrap();
        assert!(!set_value_by_path(&mut target, "instanceData.max", json!(1)));
        assert_eq!(target.get("instanceData"), Some(&json!(7)));
    }
}
