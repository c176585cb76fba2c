//! Recursive validation of documents against JVAL schemas.
//!
//! The walk is depth-first over the schema's keys and stops at the first
//! violation. Every level builds a fresh output map; the input document is
//! never modified.
//!
//! `?_` defaults are substituted in the top-level output only. Nested objects
//! (including list elements) are stored as the document wrote them, minus
//! keys removed by the extra-key policy.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ValidateOptions;
use crate::context::ContextPath;
use crate::error::{JvalError, Result, ValidationError, ValidationErrorKind};
use crate::key::{KeyKind, SchemaKey};
use crate::sanity::ensure_json_object;
use crate::types::{as_type_tag, check_type, check_type_tag, implied_type_tag};

/// Schema value that `{}` and `[]` are normalized to.
static NULL: Value = Value::Null;

/// Validates `document` against `schema`.
///
/// Returns a new object holding the recognized keys under their clean names,
/// with top-level `?_` defaults filled in. With `drop_extra_keys` undeclared keys are
/// left out of the result; without it they are an error.
///
/// # Errors
///
/// [`JvalError::InvalidInput`] if either input is not a JSON object (or is
/// nested too deeply), [`JvalError::Validation`] for the first schema
/// violation found.
///
/// # Examples
///
/// ```
/// use jval_core::validate;
/// use serde_json::json;
///
/// let schema = json!({"name": "<str>", "?_retries": 3, "*tags": ["<str>"]});
/// let document = json!({"name": "db", "tags": ["primary"]});
///
/// let validated = validate(&document, &schema, false).unwrap();
/// assert_eq!(validated, json!({"name": "db", "retries": 3, "tags": ["primary"]}));
///
/// let err = validate(&json!({}), &schema, false).unwrap_err();
/// assert_eq!(err.to_string(), "Validation error at root: missing value for key 'name'");
/// ```
pub fn validate(document: &Value, schema: &Value, drop_extra_keys: bool) -> Result<Value> {
    validate_with_options(
        document,
        schema,
        &ValidateOptions::dropping_extra_keys(drop_extra_keys),
    )
}

/// Validates `document` against `schema` with explicit [`ValidateOptions`].
///
/// # Errors
///
/// Same as [`validate`].
pub fn validate_with_options(
    document: &Value,
    schema: &Value,
    options: &ValidateOptions,
) -> Result<Value> {
    let document = ensure_json_object(document, "json_dict", options.max_depth)?;
    let schema = ensure_json_object(schema, "jval_schema", options.max_depth)?;

    debug!(
        schema_keys = schema.len(),
        document_keys = document.len(),
        drop_extra_keys = options.drop_extra_keys,
        "Validating document"
    );

    let walker = Walker {
        drop_extra_keys: options.drop_extra_keys,
    };
    let validated = walker.validate_object(schema, document, &ContextPath::root())?;

    debug!(keys = validated.len(), "Document validated");
    Ok(Value::Object(validated))
}

/// Like [`validate_with_options`], but a panic inside the engine is returned
/// as [`JvalError::Internal`] instead of unwinding into the caller.
///
/// # Errors
///
/// Same as [`validate`], plus [`JvalError::Internal`].
pub fn catch_validate(
    document: &Value,
    schema: &Value,
    options: &ValidateOptions,
) -> Result<Value> {
    isolate_panics(|| validate_with_options(document, schema, options))
}

fn isolate_panics<F>(run: F) -> Result<Value>
where
    F: FnOnce() -> Result<Value>,
{
    panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Err(JvalError::Internal(format!("validator panicked: {detail}")))
    })
}

/// Per-run walk configuration shared by every recursion level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walker {
    pub(crate) drop_extra_keys: bool,
}

impl Walker {
    /// Validates one object level and returns its validated members.
    pub(crate) fn validate_object(
        &self,
        schema: &Map<String, Value>,
        document: &Map<String, Value>,
        ctx: &ContextPath,
    ) -> std::result::Result<Map<String, Value>, ValidationError> {
        let keys: Vec<SchemaKey<'_>> = schema
            .iter()
            .map(|(raw, value)| SchemaKey::for_entry(raw, normalize(value)))
            .collect();
        reject_duplicate_keys(&keys, ctx)?;

        let mut validated = Map::new();
        for (key, schema_value) in keys.iter().zip(schema.values()) {
            let key_ctx = ctx.child(key.clean);
            let schema_value = normalize(schema_value);

            match (document.get(key.clean), schema_value) {
                (Some(Value::Object(actual)), Value::Object(nested)) => {
                    let members = self.validate_object(nested, actual, &key_ctx)?;
                    validated.insert(key.clean.to_string(), retain_present(actual, members));
                }
                (Some(Value::Array(actual)), Value::Array(items)) => {
                    let elements = self.validate_list(key, items, actual, &key_ctx)?;
                    validated.insert(key.clean.to_string(), Value::Array(elements));
                }
                (Some(actual), _) => {
                    let value = self.validate_present(key, schema_value, actual, &key_ctx)?;
                    validated.insert(key.clean.to_string(), value);
                }
                (None, _) => match key.kind {
                    KeyKind::OptionalDefault => {
                        debug!(path = %key_ctx, "Substituting default value");
                        validated.insert(key.clean.to_string(), schema_value.clone());
                    }
                    kind if kind.is_optional() => {}
                    _ => {
                        return Err(ValidationError::new(
                            ValidationErrorKind::MissingValue,
                            key.clean,
                            "missing value",
                            ctx,
                        ));
                    }
                },
            }
        }

        let mut extra_keys = document
            .keys()
            .filter(|name| !keys.iter().any(|key| key.clean == name.as_str()));
        if self.drop_extra_keys {
            let dropped = extra_keys.count();
            if dropped > 0 {
                debug!(path = %ctx, dropped, "Dropping keys not declared in schema");
            }
        } else if let Some(extra) = extra_keys.next() {
            return Err(ValidationError::new(
                ValidationErrorKind::ExtraKey,
                extra.as_str(),
                "extra key not defined in schema",
                ctx,
            ));
        }

        Ok(validated)
    }

    /// Validates a present value that is not an object/object or array/array
    /// pairing with its schema.
    fn validate_present(
        &self,
        key: &SchemaKey<'_>,
        schema_value: &Value,
        actual: &Value,
        ctx: &ContextPath,
    ) -> std::result::Result<Value, ValidationError> {
        if let Some(tag) = as_type_tag(schema_value) {
            check_type_tag(key, tag, actual, ctx)?;
            return Ok(actual.clone());
        }

        match key.kind {
            KeyKind::Typed => check_type(key, schema_value, actual, ctx)?,
            KeyKind::Optional | KeyKind::OptionalTyped | KeyKind::OptionalDefault => {
                return self.validate_optional(key, schema_value, actual, ctx);
            }
            KeyKind::Plain => match_literal(key, schema_value, actual, ctx)?,
        }
        Ok(actual.clone())
    }

    /// Dispatch for `?`, `?*` and `?_` keys whose value is present.
    fn validate_optional(
        &self,
        key: &SchemaKey<'_>,
        schema_value: &Value,
        actual: &Value,
        ctx: &ContextPath,
    ) -> std::result::Result<Value, ValidationError> {
        match key.kind {
            KeyKind::OptionalTyped => match (schema_value, actual) {
                (Value::String(tag), _) if as_type_tag(schema_value).is_some() => {
                    check_type_tag(key, tag, actual, ctx)?;
                }
                (Value::Array(items), Value::Array(elements)) => {
                    let elements = self.validate_list(key, items, elements, ctx)?;
                    return Ok(Value::Array(elements));
                }
                (Value::Array(_), _) => {
                    return Err(ValidationError::new(
                        ValidationErrorKind::TypeMismatch,
                        key.clean,
                        "expected a list",
                        ctx,
                    ));
                }
                (Value::Object(nested), Value::Object(members)) => {
                    let validated = self.validate_object(nested, members, ctx)?;
                    return Ok(retain_present(members, validated));
                }
                (Value::Object(_), _) => {
                    return Err(ValidationError::new(
                        ValidationErrorKind::TypeMismatch,
                        key.clean,
                        "expected an object",
                        ctx,
                    ));
                }
                _ => match_literal(key, schema_value, actual, ctx)?,
            },
            // The default's own runtime type is the expected type.
            KeyKind::OptionalDefault => {
                let tag = key
                    .implied_tag
                    .unwrap_or_else(|| implied_type_tag(schema_value));
                check_type_tag(key, tag, actual, ctx)?;
            }
            _ => match_literal(key, schema_value, actual, ctx)?,
        }
        Ok(actual.clone())
    }
}

/// Nested value stored for a validated object: the document's members that
/// survived validation, in document order. Defaults substituted at this level
/// are left out since they have no document counterpart.
pub(crate) fn retain_present(
    document: &Map<String, Value>,
    mut validated: Map<String, Value>,
) -> Value {
    let retained = document
        .keys()
        .filter_map(|name| validated.remove(name).map(|value| (name.clone(), value)))
        .collect();
    Value::Object(retained)
}

/// `{}` and `[]` schema values carry no structure and behave as `null`.
fn normalize(schema_value: &Value) -> &Value {
    match schema_value {
        Value::Object(map) if map.is_empty() => &NULL,
        Value::Array(items) if items.is_empty() => &NULL,
        other => other,
    }
}

fn reject_duplicate_keys(
    keys: &[SchemaKey<'_>],
    ctx: &ContextPath,
) -> std::result::Result<(), ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for key in keys {
        if !seen.insert(key.clean) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateKey,
                key.clean,
                "duplicate key after removing modifiers",
                ctx,
            ));
        }
    }
    Ok(())
}

/// Literal matcher: structural equality, including the JSON type.
pub(crate) fn match_literal(
    key: &SchemaKey<'_>,
    expected: &Value,
    actual: &Value,
    ctx: &ContextPath,
) -> std::result::Result<(), ValidationError> {
    if actual == expected {
        return Ok(());
    }
    let literal = match expected {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Err(ValidationError::new(
        ValidationErrorKind::LiteralMismatch,
        key.clean,
        format!("expected literal '{literal}'"),
        ctx,
    ))
}
