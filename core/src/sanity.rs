//! Structural checks on validation inputs.
//!
//! `serde_json::Value` cannot hold non-string keys or foreign values, so the
//! remaining requirements are that both inputs are objects and that nesting
//! stays within a bound the recursive walk can afford.

use serde_json::{Map, Value};

use crate::context::ContextPath;
use crate::error::{JvalError, Result};

/// Default nesting limit, matching `serde_json`'s parser recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Ensures `value` is a JSON object nested no deeper than `max_depth`, and
/// returns its members.
///
/// `name` identifies the input in the error message (`json_dict`,
/// `jval_schema`).
///
/// # Examples
///
/// ```
/// use jval_core::ensure_json_object;
/// use serde_json::json;
///
/// assert!(ensure_json_object(&json!({"a": [1, {"b": null}]}), "json_dict", 128).is_ok());
///
/// let err = ensure_json_object(&json!([1, 2]), "json_dict", 128).unwrap_err();
/// assert_eq!(err.to_string(), "'json_dict' must be a valid JSON object.");
/// ```
pub fn ensure_json_object<'a>(
    value: &'a Value,
    name: &str,
    max_depth: usize,
) -> Result<&'a Map<String, Value>> {
    let Value::Object(map) = value else {
        return Err(JvalError::InvalidInput(format!(
            "'{name}' must be a valid JSON object."
        )));
    };

    check_depth(value, &ContextPath::root(), 1, max_depth).map_err(|path| {
        let location = if path.is_root() {
            "root".to_string()
        } else {
            format!("'{path}'")
        };
        JvalError::InvalidInput(format!(
            "Errors in {name}: Nesting too deep at {location}: limit is {max_depth}"
        ))
    })?;
    Ok(map)
}

/// Walks containers, returning the path of the first one past the limit.
///
/// `level` counts containers from the root, which is level 1.
fn check_depth(
    value: &Value,
    path: &ContextPath,
    level: usize,
    max_depth: usize,
) -> std::result::Result<(), ContextPath> {
    match value {
        Value::Object(map) => {
            if level > max_depth {
                return Err(path.clone());
            }
            for (key, child) in map {
                check_depth(child, &path.child(key), level + 1, max_depth)?;
            }
        }
        Value::Array(items) => {
            if level > max_depth {
                return Err(path.clone());
            }
            for (index, child) in items.iter().enumerate() {
                check_depth(child, &path.index(index), level + 1, max_depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn nested(depth: usize) -> Value {
        let mut value = json!(1);
        for _ in 0..depth {
            value = json!({ "n": value });
        }
        value
    }

    #[test]
    fn test_rejects_non_object_roots() {
        for value in [json!(null), json!(1), json!("x"), json!([{}])] {
            let err = ensure_json_object(&value, "jval_schema", 8).unwrap_err();
            assert_eq!(
                err,
                JvalError::InvalidInput("'jval_schema' must be a valid JSON object.".into())
            );
        }
    }

    #[test]
    fn test_accepts_nesting_up_to_limit() {
        assert!(ensure_json_object(&nested(4), "json_dict", 4).is_ok());
    }

    #[test]
    fn test_rejects_nesting_past_limit_with_path() {
        let err = ensure_json_object(&nested(4), "json_dict", 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Errors in json_dict: Nesting too deep at 'n.n.n': limit is 3"
        );
    }

    #[test]
    fn test_empty_containers_count_as_a_level() {
        let value = json!({"a": {"b": {}}, "c": [[]]});
        assert!(ensure_json_object(&value, "json_dict", 3).is_ok());
        let err = ensure_json_object(&value, "json_dict", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Errors in json_dict: Nesting too deep at 'a.b': limit is 2"
        );
    }

    #[test]
    fn test_array_paths_in_depth_errors() {
        let value = json!({"a": [[[1]]]});
        let err = ensure_json_object(&value, "json_dict", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Errors in json_dict: Nesting too deep at 'a[0]': limit is 2"
        );
    }
}
