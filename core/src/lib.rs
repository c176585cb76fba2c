//! Validation engine for JVAL schemas.
//!
//! A JVAL schema is an ordinary JSON document that mirrors the shape of the
//! documents it accepts. Constraints are written into it with a small set of
//! symbols:
//!
//! - key prefixes: `?` optional, `*` typed, `?_` optional with a default
//! - type tags in string values: `<str>`, `<int>`, `<bool>`, `<float>`, and
//!   the nullable forms `<?str>`, `<?int>`, ...
//! - `{}` or `[]` as a schema value: same as `null`
//!
//! Everything else is matched literally. Arrays follow the shape of their
//! first schema element (see [`validate`] for the full rules).
//!
//! Validation is fail-fast: the first violation aborts the walk and is
//! reported with the clean key and the path where it was found.
//!
//! # Example
//!
//! ```
//! use jval_core::*;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "name": "<str>",
//!     "?_port": 8080,
//!     "*hosts": ["<str>"],
//!     "tls": {"?*cert": "<?str>"}
//! });
//! let document = json!({
//!     "name": "edge",
//!     "hosts": ["a.example", "b.example"],
//!     "tls": {"cert": null},
//!     "debug": true
//! });
//!
//! let validated = validate(&document, &schema, true).unwrap();
//! assert_eq!(validated["port"], 8080);
//! assert!(validated.get("debug").is_none());
//!
//! let err = validate(&document, &schema, false).unwrap_err();
//! assert_eq!(err.validation_kind(), Some(ValidationErrorKind::ExtraKey));
//! ```

mod config;
mod context;
mod error;
mod key;
mod list;
mod sanity;
mod types;
mod validate;

pub use config::ValidateOptions;
pub use context::ContextPath;
pub use error::{JvalError, OptionsError, Result, ValidationError, ValidationErrorKind};
pub use key::{KeyKind, SchemaKey, clean_key};
pub use sanity::{DEFAULT_MAX_DEPTH, ensure_json_object};
pub use types::{PrimitiveType, TypeTag, implied_type_tag, is_type_tag, value_type_name};
pub use validate::{catch_validate, validate, validate_with_options};
