//! Requested include paths
//!
//! Provides [`IncludePaths`], the parsed form of the `include` query parameter.

use crate::error::PathError;
use crate::relationship_path::RelationshipPath;
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Deduplicated, insertion-ordered set of relationship paths
///
/// An empty set means "include nothing". Whether the client supplied the
/// parameter at all is tracked by the caller with `Option<IncludePaths>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludePaths(IndexSet<RelationshipPath>);

impl IncludePaths {
    /// Empty set (include nothing)
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(IndexSet::new())
    }

    /// Build from already-parsed paths, dropping duplicates
    #[must_use]
    pub fn from_paths(paths: impl IntoIterator<Item = RelationshipPath>) -> Self {
        Self(paths.into_iter().collect())
    }

    /// Parse a list of dotted paths (array form of the parameter)
    ///
    /// # Errors
    /// Returns error on the first malformed path
    pub fn from_strings<I, S>(paths: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|p| p.as_ref().parse::<RelationshipPath>())
            .collect::<Result<IndexSet<_>, _>>()
            .map(Self)
    }

    /// Add a path; returns `false` if it was already present
    #[inline]
    pub fn insert(&mut self, path: RelationshipPath) -> bool {
        self.0.insert(path)
    }

    /// Check for an exact path
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &RelationshipPath) -> bool {
        self.0.contains(path)
    }

    /// Check for an exact path given in dotted form
    #[must_use]
    pub fn contains_str(&self, path: &str) -> bool {
        self.0.iter().any(|p| p.iter().eq(path.split('.')))
    }

    /// Number of paths
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no paths were requested
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate paths in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipPath> {
        self.0.iter()
    }

    /// Length of the longest path (0 when empty)
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.0.iter().map(RelationshipPath::len).max().unwrap_or(0)
    }

    /// Every path together with all of its leading prefixes
    ///
    /// `comments.author` expands to `comments`, `comments.author`.
    #[must_use]
    pub fn prefixes(&self) -> Self {
        let mut all = IndexSet::new();
        for path in &self.0 {
            for n in 1..=path.len() {
                if let Some(prefix) = path.take(n) {
                    all.insert(prefix);
                }
            }
        }
        Self(all)
    }
}

impl Display for IncludePaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for path in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{path}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for IncludePaths {
    type Err = PathError;

    /// Split on commas; an empty string yields an explicitly empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::parse::<RelationshipPath>)
            .collect::<Result<IndexSet<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<RelationshipPath> for IncludePaths {
    fn from_iter<T: IntoIterator<Item = RelationshipPath>>(iter: T) -> Self {
        Self::from_paths(iter)
    }
}

impl<'a> IntoIterator for &'a IncludePaths {
    type Item = &'a RelationshipPath;
    type IntoIter = indexmap::set::Iter<'a, RelationshipPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for IncludePaths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IncludePaths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
