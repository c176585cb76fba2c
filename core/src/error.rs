//! Error types for JVAL validation.
//!
//! Validation failures carry the offending key, a short reason and the
//! context path; their `Display` impl is the user-visible report text.

use thiserror::Error;

use crate::context::ContextPath;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Required key absent from the document.
    MissingValue,
    /// Document key not declared in the schema.
    ExtraKey,
    /// Value does not satisfy the declared type tag.
    TypeMismatch,
    /// Type tag names a type outside `str`, `int`, `bool`, `float`.
    UnknownType,
    /// Value does not equal the declared literal.
    LiteralMismatch,
    /// Array length or emptiness does not match the schema.
    ListLengthMismatch,
    /// Two schema keys of one object share a clean key.
    DuplicateKey,
}

/// A single schema violation.
///
/// Rendered as `Validation error at '<path>': <reason> for key '<key>'`, or
/// `Validation error at root: ...` when the path is empty.
///
/// # Examples
///
/// ```
/// use jval_core::{ContextPath, ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(
///     ValidationErrorKind::MissingValue,
///     "name",
///     "missing value",
///     &ContextPath::root(),
/// );
/// assert_eq!(
///     err.to_string(),
///     "Validation error at root: missing value for key 'name'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error at {}: {reason} for key '{key}'", location(.path))]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Clean key the failure is reported for.
    pub key: String,
    pub reason: String,
    /// Context path, empty at the document root.
    pub path: String,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        key: impl Into<String>,
        reason: impl Into<String>,
        context: &ContextPath,
    ) -> Self {
        Self {
            kind,
            key: key.into(),
            reason: reason.into(),
            path: context.as_str().to_string(),
        }
    }
}

fn location(path: &str) -> String {
    if path.trim().is_empty() {
        "root".to_string()
    } else {
        format!("'{path}'")
    }
}

/// Errors returned by the validation entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JvalError {
    /// The document violates the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Document or schema is not a well-formed JSON object.
    #[error("{0}")]
    InvalidInput(String),

    /// The engine failed in a way that is neither of the above.
    #[error("{0}")]
    Internal(String),
}

impl JvalError {
    /// Kind of the underlying validation failure, if this is one.
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            Self::Validation(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`JvalError`].
pub type Result<T> = std::result::Result<T, JvalError>;

/// Errors raised while loading [`ValidateOptions`](crate::ValidateOptions).
#[derive(Debug, Error)]
pub enum OptionsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML (or JSON) parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
