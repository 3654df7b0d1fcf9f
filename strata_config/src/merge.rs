//! Deep merge of configuration trees.

use crate::value::{Dict, Value};

/// Merge `layer` into `target`, the layer taking precedence.
///
/// Only object/object collisions merge field-wise; any other pairing
/// replaces the target wholesale, arrays included. Folding layers in
/// source order with this function is associative but not commutative.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata_config::{Value, merge_value};
///
/// let mut acc = Value::from(json!({"a": 1, "b": {"x": 1}}));
/// merge_value(&mut acc, Value::from(json!({"b": {"y": 2}, "c": 3})));
/// assert_eq!(acc, Value::from(json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3})));
///
/// // Arrays replace, never merge element-wise.
/// merge_value(&mut acc, Value::from(json!({"b": [1, 2]})));
/// assert_eq!(acc.get("b"), Some(&Value::from(json!([1, 2]))));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(existing), Value::Object(entries)) => merge_dict(existing, entries),
        (slot, replacement) => *slot = replacement,
    }
}

/// Merge the object `layer` into `target` field by field.
///
/// Same semantics as [`merge_value`], specialised to the object roots the
/// sources produce.
pub fn merge_dict(target: &mut Dict, layer: Dict) {
    for (key, value) in layer {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}
