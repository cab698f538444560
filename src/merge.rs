//! Deep merge of configuration values
//!
//! Configuration documents are merged left to right. Mappings merge key by
//! key, recursively; every other collision is won by the later document, and
//! a mapping colliding with a non-mapping is replaced wholesale.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tmpl::merge::merge;
//!
//! let merged = merge(json!({"a": {"x": 1}}), json!({"a": {"y": 2}}));
//! assert_eq!(merged, json!({"a": {"x": 1, "y": 2}}));
//!
//! let replaced = merge(json!({"a": {"x": 1}}), json!({"a": [1, 2]}));
//! assert_eq!(replaced, json!({"a": [1, 2]}));
//! ```

use log::debug;
use serde_json::Value;

/// Merge `overlay` on top of `base` and return the result.
pub fn merge(mut base: Value, overlay: Value) -> Value {
    merge_values(&mut base, overlay, "");
    base
}

/// Recursively merge `source` into `target` in place.
///
/// `path` is the dotted key path of `target`, used for logging only.
pub fn merge_values(target: &mut Value, source: Value, path: &str) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                let key_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value, &key_path),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, source) => {
            if target.is_object() {
                debug!(
                    "Replacing mapping at '{}' with {}",
                    path,
                    type_name(&source)
                );
            }
            *target = source;
        }
    }
}

/// Human-readable name of a value's type.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
