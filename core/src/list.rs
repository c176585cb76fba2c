//! Array validation.
//!
//! Schema arrays are assumed homogeneous; the first element decides how the
//! document array is checked:
//!
//! - no element: the document array must be empty too
//! - scalar: a single type tag under a key with a `*` modifier (`*key`,
//!   `?*key`, `?_*key`) checks every element's type, otherwise the schema is
//!   a fixed literal sequence
//! - object: every document element must satisfy every object schema
//! - array: every document element is validated as a list against it

use serde_json::{Map, Value};

use crate::context::ContextPath;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::key::SchemaKey;
use crate::types::{as_type_tag, check_type_tag};
use crate::validate::{Walker, match_literal, retain_present};

impl Walker {
    /// Validates `actual` against the schema array and returns the validated
    /// elements.
    pub(crate) fn validate_list(
        &self,
        key: &SchemaKey<'_>,
        schema_items: &[Value],
        actual: &[Value],
        ctx: &ContextPath,
    ) -> Result<Vec<Value>, ValidationError> {
        let Some(first) = schema_items.first() else {
            if actual.is_empty() {
                return Ok(Vec::new());
            }
            return Err(ValidationError::new(
                ValidationErrorKind::ListLengthMismatch,
                key.clean,
                "list mismatch: schema expects an empty list but JSON is not empty",
                ctx,
            ));
        };

        match first {
            Value::Object(_) => self.validate_object_elements(key, schema_items, actual, ctx),
            Value::Array(nested) => self.validate_nested_lists(key, nested, actual, ctx),
            // A leading null constrains nothing on its own; compare the whole
            // sequence literally rather than accepting any array.
            Value::Null => validate_literal_sequence(key, schema_items, actual, ctx),
            scalar => match as_type_tag(scalar) {
                Some(tag) if key.typed_list => validate_typed_elements(key, tag, actual, ctx),
                _ => validate_literal_sequence(key, schema_items, actual, ctx),
            },
        }
    }

    /// Checks each element against every object schema, in schema order.
    ///
    /// The stored element holds the document members accepted by any of the
    /// schemas, in document order.
    fn validate_object_elements(
        &self,
        key: &SchemaKey<'_>,
        schema_items: &[Value],
        actual: &[Value],
        ctx: &ContextPath,
    ) -> Result<Vec<Value>, ValidationError> {
        let schemas: Vec<&Map<String, Value>> =
            schema_items.iter().filter_map(Value::as_object).collect();

        let mut validated = Vec::with_capacity(actual.len());
        for (index, element) in actual.iter().enumerate() {
            let element_ctx = ctx.index(index);
            let Value::Object(members) = element else {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    key.clean,
                    "expected an object",
                    &element_ctx,
                ));
            };

            let mut merged = Map::new();
            for schema in &schemas {
                let output = self.validate_object(schema, members, &element_ctx)?;
                merged.extend(output);
            }
            validated.push(retain_present(members, merged));
        }
        Ok(validated)
    }

    /// Validates each element as a list against the nested schema list.
    fn validate_nested_lists(
        &self,
        key: &SchemaKey<'_>,
        nested: &[Value],
        actual: &[Value],
        ctx: &ContextPath,
    ) -> Result<Vec<Value>, ValidationError> {
        let mut validated = Vec::with_capacity(actual.len());
        for (index, element) in actual.iter().enumerate() {
            let element_ctx = ctx.index(index);
            let Value::Array(items) = element else {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    key.clean,
                    "expected a list",
                    &element_ctx,
                ));
            };
            let inner = self.validate_list(key, nested, items, &element_ctx)?;
            validated.push(Value::Array(inner));
        }
        Ok(validated)
    }
}

/// Homogeneous typed list: any length, every element checked against `tag`.
fn validate_typed_elements(
    key: &SchemaKey<'_>,
    tag: &str,
    actual: &[Value],
    ctx: &ContextPath,
) -> Result<Vec<Value>, ValidationError> {
    for (index, element) in actual.iter().enumerate() {
        check_type_tag(key, tag, element, &ctx.index(index))?;
    }
    Ok(actual.to_vec())
}

/// Fixed literal sequence: equal length, positional equality.
fn validate_literal_sequence(
    key: &SchemaKey<'_>,
    schema_items: &[Value],
    actual: &[Value],
    ctx: &ContextPath,
) -> Result<Vec<Value>, ValidationError> {
    if actual.len() != schema_items.len() {
        return Err(ValidationError::new(
            ValidationErrorKind::ListLengthMismatch,
            key.clean,
            "list length mismatch",
            ctx,
        ));
    }
    for (index, (element, expected)) in actual.iter().zip(schema_items).enumerate() {
        match_literal(key, expected, element, &ctx.index(index))?;
    }
    Ok(actual.to_vec())
}
