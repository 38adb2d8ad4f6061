use serde_json::{Map, Value};

use crate::document::{ALL_KEY, Document};

/// How an overlay mapping combines with its base.
enum Overlay {
    /// `__all__: true`: the base is discarded.
    Replace(Map<String, Value>),
    Merge(Map<String, Value>),
}

impl Overlay {
    fn classify(mut map: Map<String, Value>) -> Self {
        match map.remove(ALL_KEY) {
            Some(Value::Bool(true)) => Self::Replace(map),
            _ => Self::Merge(map),
        }
    }
}

/// Deep merge `overlay` into `base`. Overlay wins for non-mapping values;
/// mappings present on both sides merge recursively. The `__all__` marker
/// is consumed and never appears in the result.
pub fn merge_documents(base: Document, overlay: Document) -> Document {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let (mut merged, entries) = match Overlay::classify(overlay_map) {
                Overlay::Replace(entries) => (Map::new(), entries),
                Overlay::Merge(entries) => (base_map, entries),
            };
            for (key, overlay_val) in entries {
                let merged_val = match merged.remove(&key) {
                    Some(base_val) => merge_documents(base_val, overlay_val),
                    None => strip_markers(overlay_val),
                };
                merged.insert(key, merged_val);
            }
            Value::Object(merged)
        }
        (_, overlay) => strip_markers(overlay),
    }
}

/// Remove `__all__` keys from every mapping nested in `value`.
pub(crate) fn strip_markers(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != ALL_KEY)
                .map(|(key, val)| (key, strip_markers(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_markers).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_mappings_merge_recursively() {
        let base = json!({"layout": {"grid": [1, 1], "view": "axial"}, "keep": 1});
        let overlay = json!({"layout": {"grid": [2, 2]}, "new": true});
        assert_eq!(
            merge_documents(base, overlay),
            json!({"layout": {"grid": [2, 2], "view": "axial"}, "keep": 1, "new": true})
        );
    }

    #[test]
    fn test_overlay_scalar_replaces_mapping_and_vice_versa() {
        let merged = merge_documents(json!({"a": {"b": 1}, "c": 2}), json!({"a": 5, "c": {"d": 1}}));
        assert_eq!(merged, json!({"a": 5, "c": {"d": 1}}));
    }

    #[test]
    fn test_lists_are_replaced_not_concatenated() {
        let merged = merge_documents(json!({"labels": ["a", "b"]}), json!({"labels": ["c"]}));
        assert_eq!(merged, json!({"labels": ["c"]}));
    }

    #[test]
    fn test_all_marker_replaces_base() {
        let merged = merge_documents(
            json!({"a": 1, "b": {"c": 2}}),
            json!({"__all__": true, "b": {"d": 3}}),
        );
        assert_eq!(merged, json!({"b": {"d": 3}}));
    }

    #[test]
    fn test_all_marker_in_nested_mapping() {
        let merged = merge_documents(
            json!({"labels": {"liver": "red", "spleen": "blue"}, "other": 1}),
            json!({"labels": {"__all__": true, "kidney": "green"}}),
        );
        assert_eq!(merged, json!({"labels": {"kidney": "green"}, "other": 1}));
    }

    #[test]
    fn test_all_marker_false_merges_and_is_dropped() {
        let merged = merge_documents(json!({"a": 1}), json!({"__all__": false, "b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_marker_never_copied_from_new_subtrees() {
        let merged = merge_documents(
            json!({}),
            json!({"fresh": {"__all__": true, "deep": {"__all__": true, "x": 1}}}),
        );
        assert_eq!(merged, json!({"fresh": {"deep": {"x": 1}}}));
    }

    #[test]
    fn test_non_mapping_base_takes_overlay() {
        assert_eq!(merge_documents(json!([1, 2]), json!({"a": 1})), json!({"a": 1}));
        assert_eq!(merge_documents(json!({"a": 1}), json!("x")), json!("x"));
    }
}
