//! Location tracking for error reports.

use std::fmt;

/// Dotted/bracketed path of the value currently being validated.
///
/// Object keys are joined with `.`, array positions are appended as `[i]`.
/// The root path is empty. Paths are immutable; each step returns a new one.
///
/// # Examples
///
/// ```
/// use jval_core::ContextPath;
///
/// let path = ContextPath::root().child("servers").index(2).child("port");
/// assert_eq!(path.as_str(), "servers[2].port");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextPath(String);

impl ContextPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the object member `key` below this path.
    pub fn child(&self, key: &str) -> Self {
        if self.is_root() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    /// Path of the array element at `index` below this path.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_of_root_has_no_leading_dot() {
        assert_eq!(ContextPath::root().child("a").as_str(), "a");
        assert_eq!(ContextPath::root().child("a").child("b").as_str(), "a.b");
    }

    #[test]
    fn test_nested_indices() {
        let path = ContextPath::root().child("grid").index(0).index(3);
        assert_eq!(path.to_string(), "grid[0][3]");
        assert!(!path.is_root());
        assert!(ContextPath::root().is_root());
    }
}
