//! Validation options.
//!
//! Options can be built in code or loaded from a YAML file. JSON is a YAML
//! subset, so a `kwargs.json` style file loads too.
//!
//! # Example YAML
//!
//! ```yaml
//! drop_extra_keys: true
//! max_depth: 64
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::sanity::DEFAULT_MAX_DEPTH;

/// Settings for a validation run.
///
/// Every field has a default, so an empty file (or `{}`) yields
/// [`ValidateOptions::default`].
///
/// # Examples
///
/// ```
/// use jval_core::ValidateOptions;
///
/// let options: ValidateOptions = serde_yaml::from_str("drop_extra_keys: true").unwrap();
/// assert!(options.drop_extra_keys);
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Silently leave out document keys the schema does not declare, instead
    /// of failing with an extra-key error.
    pub drop_extra_keys: bool,
    /// Maximum container nesting accepted in either input.
    pub max_depth: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            drop_extra_keys: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidateOptions {
    /// Options with only `drop_extra_keys` set.
    pub fn dropping_extra_keys(drop_extra_keys: bool) -> Self {
        Self {
            drop_extra_keys,
            ..Self::default()
        }
    }

    /// Loads options from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](OptionsError::IoError) if the file cannot be read,
    /// or [`YamlError`](OptionsError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let options = serde_yaml::from_reader(reader)?;
        Ok(options)
    }
}
