//! Target paths describe where a function may read from.
//!
//! Targets are computed without executing anything, so callers can decide
//! ahead of time what a query depends on.

use std::collections::HashSet;
use std::sync::Arc;

use crate::context::NamedMaps;

/// Storage class a target path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// The structured body of a record (or the bound value)
    Value,
    /// The metadata of a record
    Metadata,
    /// A named variable
    Variable,
}

/// A potential read location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    /// Storage class
    pub target_type: TargetType,
    /// Path segments, empty for the whole body or metadata map
    pub path: Vec<String>,
}

impl TargetPath {
    /// Create a target path from segments
    pub fn new<I, S>(target_type: TargetType, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_type,
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

/// Context threaded through static target analysis
#[derive(Clone, Default)]
pub struct TargetsContext {
    maps: Arc<NamedMaps>,
    expanding: Arc<HashSet<String>>,
}

impl TargetsContext {
    /// Create an empty targets context
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the named maps visible to `apply`
    #[must_use]
    pub fn with_maps(mut self, maps: Arc<NamedMaps>) -> Self {
        self.maps = maps;
        self
    }

    /// Named maps visible to `apply`
    pub fn maps(&self) -> &NamedMaps {
        &self.maps
    }

    /// Whether the named map is already being expanded further up
    pub(crate) fn is_expanding(&self, name: &str) -> bool {
        self.expanding.contains(name)
    }

    /// Derive a context for analysing the body of the named map
    pub(crate) fn entering(&self, name: &str) -> Self {
        let mut expanding = (*self.expanding).clone();
        expanding.insert(name.to_string());
        Self {
            maps: Arc::clone(&self.maps),
            expanding: Arc::new(expanding),
        }
    }
}

impl std::fmt::Debug for TargetsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetsContext")
            .field("maps", &self.maps.len())
            .field("expanding", &self.expanding)
            .finish()
    }
}

/// Split a dotted path into segments, the empty path has none
pub(crate) fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("foo.bar.baz"), vec!["foo", "bar", "baz"]);
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_target_path_new() {
        let path = TargetPath::new(TargetType::Metadata, ["foo"]);
        assert_eq!(path.target_type, TargetType::Metadata);
        assert_eq!(path.path, vec!["foo".to_string()]);
        let whole = TargetPath::new(TargetType::Value, Vec::<String>::new());
        assert!(whole.path.is_empty());
    }

    #[test]
    fn test_entering_map() {
        let ctx = TargetsContext::new();
        let inner = ctx.entering("walk");
        assert!(inner.is_expanding("walk"));
        assert!(!inner.is_expanding("other"));
        assert!(!ctx.is_expanding("walk"));
    }
}
