//! Schema key classification.
//!
//! Schema keys carry leading modifier symbols in front of the document key:
//!
//! | Prefix | Meaning |
//! |---|---|
//! | `?` | field is optional |
//! | `*` | schema value is a type declaration |
//! | `?_` | optional with a default (schema value is the default) |
//!
//! Classification happens once per key; the rest of the engine dispatches on
//! [`KeyKind`] instead of re-inspecting prefixes.

use serde_json::Value;

use crate::types::implied_type_tag;

pub const SYMBOL_OPTIONAL: char = '?';
pub const SYMBOL_TYPED: char = '*';
pub const SYMBOL_DEFAULT: char = '_';

const MODIFIERS: [char; 3] = [SYMBOL_OPTIONAL, SYMBOL_TYPED, SYMBOL_DEFAULT];

/// Modifier combination of a schema key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// No recognized modifier: value is matched literally.
    Plain,
    /// `?key`
    Optional,
    /// `*key`
    Typed,
    /// `?*key`
    OptionalTyped,
    /// `?_key`
    OptionalDefault,
}

impl KeyKind {
    /// Classifies a raw schema key by its leading symbols.
    ///
    /// Unrecognized combinations (such as `_key` or `*?key`) fall back to the
    /// first symbol that has a meaning on its own.
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with("?*") {
            Self::OptionalTyped
        } else if raw.starts_with("?_") {
            Self::OptionalDefault
        } else if raw.starts_with(SYMBOL_OPTIONAL) {
            Self::Optional
        } else if raw.starts_with(SYMBOL_TYPED) {
            Self::Typed
        } else {
            Self::Plain
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::Optional | Self::OptionalTyped | Self::OptionalDefault
        )
    }
}

/// A classified schema key.
///
/// # Examples
///
/// ```
/// use jval_core::{KeyKind, SchemaKey};
///
/// let key = SchemaKey::parse("?_retries");
/// assert_eq!(key.clean, "retries");
/// assert_eq!(key.kind, KeyKind::OptionalDefault);
/// assert!(!key.typed_list);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaKey<'a> {
    pub raw: &'a str,
    /// Key with every leading modifier stripped; matched against the document.
    pub clean: &'a str,
    pub kind: KeyKind,
    /// The key declares its list elements by type (`*` anywhere among its
    /// modifiers).
    pub typed_list: bool,
    /// Type tag implied by the default of a `?_` key, such as `<int>`.
    pub implied_tag: Option<&'static str>,
}

impl<'a> SchemaKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let clean = clean_key(raw);
        let modifiers = &raw[..raw.len() - clean.len()];
        Self {
            raw,
            clean,
            kind: KeyKind::classify(raw),
            typed_list: modifiers.contains(SYMBOL_TYPED),
            implied_tag: None,
        }
    }

    /// Classifies a schema entry, deriving the implied tag of a `?_` default
    /// from `schema_value`.
    pub fn for_entry(raw: &'a str, schema_value: &Value) -> Self {
        let mut key = Self::parse(raw);
        if key.kind == KeyKind::OptionalDefault {
            key.implied_tag = Some(implied_type_tag(schema_value));
        }
        key
    }
}

/// Strips every leading `?`, `*` and `_` from a schema key.
pub fn clean_key(raw: &str) -> &str {
    raw.trim_start_matches(&MODIFIERS[..])
}
