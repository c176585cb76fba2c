//! Type tags and the type checker.
//!
//! A type tag is a schema string of the form `<name>` or `<?name>`, where
//! `name` is one of `str`, `int`, `bool`, `float`. The `?` inside the tag
//! makes `null` acceptable as well.

use std::fmt;

use serde_json::Value;

use crate::context::ContextPath;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::key::SchemaKey;

pub const SYMBOL_TYPE_START: char = '<';
pub const SYMBOL_TYPE_END: char = '>';
const SYMBOL_NULLABLE: char = '?';

/// Primitive types a tag can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Str,
    Int,
    Bool,
    Float,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            "float" => Some(Self::Float),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
        }
    }

    /// Exact type match, except that `float` also accepts integers.
    ///
    /// Booleans never satisfy `int` or `float`.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Str, Value::String(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, Value::Number(_)) => true,
            _ => false,
        }
    }
}

/// A parsed type tag.
///
/// # Examples
///
/// ```
/// use jval_core::{PrimitiveType, TypeTag};
/// use serde_json::json;
///
/// let tag = TypeTag::parse("<?int>").unwrap();
/// assert_eq!(tag.primitive, PrimitiveType::Int);
/// assert!(tag.accepts(&json!(null)));
/// assert!(tag.accepts(&json!(3)));
/// assert!(!tag.accepts(&json!(true)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub primitive: PrimitiveType,
    pub nullable: bool,
}

impl TypeTag {
    /// Parses a tag; returns `None` when the name is not a supported type.
    ///
    /// Delimiters are stripped when present, so a bare name such as `int`
    /// parses too.
    pub fn parse(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix(SYMBOL_TYPE_START).unwrap_or(raw);
        let inner = inner.strip_suffix(SYMBOL_TYPE_END).unwrap_or(inner);
        let (nullable, name) = match inner.strip_prefix(SYMBOL_NULLABLE) {
            Some(name) => (true, name),
            None => (false, inner),
        };
        PrimitiveType::from_name(name).map(|primitive| Self {
            primitive,
            nullable,
        })
    }

    pub fn accepts(&self, value: &Value) -> bool {
        (self.nullable && value.is_null()) || self.primitive.matches(value)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nullable = if self.nullable { "?" } else { "" };
        write!(
            f,
            "{SYMBOL_TYPE_START}{nullable}{}{SYMBOL_TYPE_END}",
            self.primitive.name()
        )
    }
}

/// Returns true when `s` is written as a type tag (`<...>`).
pub fn is_type_tag(s: &str) -> bool {
    s.len() >= 2 && s.starts_with(SYMBOL_TYPE_START) && s.ends_with(SYMBOL_TYPE_END)
}

/// Returns the type tag held by `value`, if it is a tag-shaped string.
pub fn as_type_tag(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| is_type_tag(s))
}

/// Name of the runtime type of a JSON value, in JSON vocabulary.
///
/// Used to derive the implicit type of a `?_` default. Only `str`, `int`,
/// `float` and `bool` are valid tag names. `null`, `array` and `object`
/// are not, so a present value checked against them fails with
/// `unknown type <null> in schema` (or `<array>`, `<object>`).
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Tag implied by a default value, e.g. `<int>` for `5`.
pub fn implied_type_tag(default: &Value) -> &'static str {
    match default {
        Value::Null => "<null>",
        Value::Bool(_) => "<bool>",
        Value::Number(n) if n.is_f64() => "<float>",
        Value::Number(_) => "<int>",
        Value::String(_) => "<str>",
        Value::Array(_) => "<array>",
        Value::Object(_) => "<object>",
    }
}

/// Checks `value` against the schema-supplied `tag`.
///
/// A schema value that is not a string carries no type constraint.
pub(crate) fn check_type(
    key: &SchemaKey<'_>,
    schema_value: &Value,
    value: &Value,
    ctx: &ContextPath,
) -> Result<(), ValidationError> {
    match schema_value.as_str() {
        Some(tag) => check_type_tag(key, tag, value, ctx),
        None => Ok(()),
    }
}

pub(crate) fn check_type_tag(
    key: &SchemaKey<'_>,
    raw_tag: &str,
    value: &Value,
    ctx: &ContextPath,
) -> Result<(), ValidationError> {
    let Some(tag) = TypeTag::parse(raw_tag) else {
        return Err(ValidationError::new(
            ValidationErrorKind::UnknownType,
            key.clean,
            format!("unknown type {raw_tag} in schema"),
            ctx,
        ));
    };

    if tag.accepts(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::TypeMismatch,
            key.clean,
            format!("expected type {raw_tag}"),
            ctx,
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(tag: &str, value: Value) -> Result<(), ValidationError> {
        let key = SchemaKey::parse("*field");
        check_type_tag(&key, tag, &value, &ContextPath::root().child("field"))
    }

    #[test]
    fn test_float_accepts_integers() {
        assert!(check("<float>", json!(3)).is_ok());
        assert!(check("<float>", json!(3.5)).is_ok());
        assert!(check("<float>", json!(-3)).is_ok());
    }

    #[test]
    fn test_int_rejects_floats() {
        let err = check("<int>", json!(3.0)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert!(check("<int>", json!(u64::MAX)).is_ok());
        assert!(check("<int>", json!(i64::MIN)).is_ok());
    }

    #[test]
    fn test_bool_and_numbers_are_not_conflated() {
        assert!(check("<bool>", json!(1)).is_err());
        assert!(check("<int>", json!(true)).is_err());
        assert!(check("<float>", json!(false)).is_err());
        assert!(check("<bool>", json!(false)).is_ok());
    }

    #[test]
    fn test_nullable_tag_accepts_null_only_when_marked() {
        assert!(check("<?str>", json!(null)).is_ok());
        assert!(check("<?str>", json!("x")).is_ok());
        assert!(check("<?str>", json!(1)).is_err());
        assert!(check("<str>", json!(null)).is_err());
    }

    #[test]
    fn test_unknown_type_is_reported_with_raw_tag() {
        let err = check("<date>", json!("2024-01-01")).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownType);
        assert_eq!(
            err.to_string(),
            "Validation error at 'field': unknown type <date> in schema for key 'field'"
        );
    }

    #[test]
    fn test_unknown_type_wins_over_nullable_shortcut() {
        let err = check("<?date>", json!(null)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownType);
    }

    #[test]
    fn test_mismatch_message_names_expected_tag() {
        let err = check("<?int>", json!("7")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error at 'field': expected type <?int> for key 'field'"
        );
    }

    #[test]
    fn test_tag_detection() {
        assert!(is_type_tag("<str>"));
        assert!(is_type_tag("<>"));
        assert!(!is_type_tag("<"));
        assert!(!is_type_tag("str"));
        assert!(!is_type_tag("<str"));
        assert_eq!(as_type_tag(&json!("<int>")), Some("<int>"));
        assert_eq!(as_type_tag(&json!(5)), None);
    }

    #[test]
    fn test_implied_tags_follow_runtime_type() {
        assert_eq!(implied_type_tag(&json!(5)), "<int>");
        assert_eq!(implied_type_tag(&json!(5.5)), "<float>");
        assert_eq!(implied_type_tag(&json!("x")), "<str>");
        assert_eq!(implied_type_tag(&json!(true)), "<bool>");
        assert_eq!(implied_type_tag(&json!(null)), "<null>");
        assert_eq!(implied_type_tag(&json!([1])), "<array>");
        assert_eq!(implied_type_tag(&json!({"a": 1})), "<object>");
        assert_eq!(TypeTag::parse("<null>"), None);
        assert_eq!(TypeTag::parse("<array>"), None);
        assert_eq!(TypeTag::parse("<object>"), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let tag = TypeTag::parse("<?float>").unwrap();
        assert_eq!(tag.to_string(), "<?float>");
        assert_eq!(TypeTag::parse("int").map(|t| t.primitive), Some(PrimitiveType::Int));
    }

    #[test]
    fn test_non_string_schema_value_is_unconstrained() {
        let key = SchemaKey::parse("*field");
        let ctx = ContextPath::root();
        assert!(check_type(&key, &json!(5), &json!("anything"), &ctx).is_ok());
        assert!(check_type(&key, &Value::Null, &json!([1, 2]), &ctx).is_ok());
    }
}
