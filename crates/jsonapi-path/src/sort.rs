//! Sort fields
//!
//! Provides [`SortField`] and [`SortFields`], the parsed form of `sort`.

use crate::error::SortError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Single sort key with direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    name: String,
    descending: bool,
}

impl SortField {
    /// Ascending sort on a field
    #[must_use]
    pub fn ascending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    /// Descending sort on a field
    #[must_use]
    pub fn descending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: true,
        }
    }

    /// Field name without direction prefix
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check for ascending direction
    #[inline]
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        !self.descending
    }

    /// Check for descending direction
    #[inline]
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.descending
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (name, descending) = if let Some(rest) = token.strip_prefix('-') {
            (rest, true)
        } else if let Some(rest) = token.strip_prefix('+') {
            (rest, false)
        } else {
            (token, false)
        };

        if name.is_empty() {
            return Err(SortError::MissingName(token.to_string()));
        }
        if name.starts_with(['-', '+']) || name.contains(|c: char| c == ',' || c.is_whitespace()) {
            return Err(SortError::InvalidName(token.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            descending,
        })
    }
}

/// Ordered sort keys; the first is the primary sort
///
/// Duplicate names are kept as given so that validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortFields(Vec<SortField>);

impl SortFields {
    /// No sorting
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Build from sort fields
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = SortField>) -> Self {
        Self(fields.into_iter().collect())
    }

    /// Iterate sort fields in priority order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SortField> {
        self.0.iter()
    }

    /// Field names in priority order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(SortField::name)
    }

    /// Check if a field is sorted on (either direction)
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f.name == name)
    }

    /// Names that appear more than once, in order of first repetition
    #[must_use]
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for name in self.names() {
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }

        duplicates
    }

    /// Number of sort fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no sort was requested
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for SortFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(","))
    }
}

impl FromStr for SortFields {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|token| !token.trim().is_empty())
            .map(str::parse::<SortField>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<'a> IntoIterator for &'a SortFields {
    type Item = &'a SortField;
    type IntoIter = std::slice::Iter<'a, SortField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for SortFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_directions() {
        let asc: SortField = "title".parse().unwrap();
        let plus: SortField = "+title".parse().unwrap();
        let desc: SortField = "-createdAt".parse().unwrap();

        assert!(asc.is_ascending());
        assert_eq!(asc, plus);
        assert!(desc.is_descending());
        assert_eq!(desc.name(), "createdAt");
    }

    #[test]
    fn sort_field_display() {
        assert_eq!(SortField::ascending("title").to_string(), "title");
        assert_eq!(SortField::descending("title").to_string(), "-title");
    }

    #[test]
    fn sort_field_missing_name() {
        let result: Result<SortField, _> = "-".parse();
        assert!(matches!(result, Err(SortError::MissingName(_))));
    }

    #[test]
    fn sort_field_double_prefix_is_invalid() {
        let result: Result<SortField, _> = "--title".parse();
        assert!(matches!(result, Err(SortError::InvalidName(_))));
    }

    #[test]
    fn sort_fields_from_str_preserves_order() {
        let sorts: SortFields = "-createdAt,title".parse().unwrap();
        let names: Vec<&str> = sorts.names().collect();
        assert_eq!(names, vec!["createdAt", "title"]);
        assert_eq!(sorts.to_string(), "-createdAt,title");
    }

    #[test]
    fn sort_fields_empty() {
        let sorts: SortFields = "".parse().unwrap();
        assert!(sorts.is_empty());
    }

    #[test]
    fn sort_fields_keep_duplicates() {
        let sorts: SortFields = "title,-title,slug,title,slug".parse().unwrap();
        assert_eq!(sorts.len(), 5);
        assert_eq!(sorts.duplicates(), vec!["title", "slug"]);
    }

    #[test]
    fn sort_fields_serde() {
        let sorts: SortFields = "-createdAt,title".parse().unwrap();
        let json = serde_json::to_string(&sorts).unwrap();
        assert_eq!(json, "\"-createdAt,title\"");
    }
}
