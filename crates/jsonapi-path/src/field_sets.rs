//! Sparse fieldsets
//!
//! Provides [`FieldSet`] and [`FieldSets`], the parsed form of `fields[type]`.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Ordered set of field names requested for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(IndexSet<String>);

impl FieldSet {
    /// Build from field names, dropping duplicates
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list; blank entries are ignored
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self(
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Check if a field is listed
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    /// Number of listed fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty set requests no fields at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate field names in request order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromStr for FieldSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Display for FieldSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

/// Sparse fieldsets keyed by resource type
///
/// A type without an entry is unrestricted. A type mapped to an empty
/// [`FieldSet`] gets no attributes or relationships at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSets(IndexMap<String, FieldSet>);

impl FieldSets {
    /// No restrictions for any type
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Parse `(type, "field1,field2")` pairs
    ///
    /// Later entries for the same type replace earlier ones.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut sets = Self::new();
        for (resource_type, fields) in pairs {
            sets.insert(resource_type, FieldSet::parse(fields.as_ref()));
        }
        sets
    }

    /// Set the fieldset for a type, with builder-style chaining
    #[must_use]
    pub fn with(mut self, resource_type: impl Into<String>, fields: FieldSet) -> Self {
        self.insert(resource_type, fields);
        self
    }

    /// Set the fieldset for a type
    pub fn insert(&mut self, resource_type: impl Into<String>, fields: FieldSet) {
        self.0.insert(resource_type.into(), fields);
    }

    /// Fieldset for a type, if restricted
    #[inline]
    #[must_use]
    pub fn get(&self, resource_type: &str) -> Option<&FieldSet> {
        self.0.get(resource_type)
    }

    /// Check if a type has a sparse fieldset
    #[inline]
    #[must_use]
    pub fn is_restricted(&self, resource_type: &str) -> bool {
        self.0.contains_key(resource_type)
    }

    /// Check whether a field of a type should be serialized
    #[must_use]
    pub fn allows(&self, resource_type: &str, field: &str) -> bool {
        self.0
            .get(resource_type)
            .map_or(true, |set| set.contains(field))
    }

    /// Restricted type names
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate `(type, fieldset)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSet)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of restricted types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no type is restricted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_set_from_str() {
        let set: FieldSet = "title, content,title".parse().unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("title"));
        assert!(set.contains("content"));
        assert_eq!(set.to_string(), "title,content");
    }

    #[test]
    fn field_set_empty_string_is_empty_set() {
        let set: FieldSet = "".parse().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn field_sets_absent_type_is_unrestricted() {
        let sets = FieldSets::from_pairs([("posts", "title")]);
        assert!(sets.allows("users", "name"));
        assert!(!sets.is_restricted("users"));
    }

    #[test]
    fn field_sets_empty_list_allows_nothing() {
        let sets = FieldSets::from_pairs([("posts", "")]);
        assert!(sets.is_restricted("posts"));
        assert!(!sets.allows("posts", "title"));
        assert!(!sets.allows("posts", "author"));
    }

    #[test]
    fn field_sets_listed_fields() {
        let sets = FieldSets::from_pairs([("posts", "title,author")]);
        assert!(sets.allows("posts", "title"));
        assert!(sets.allows("posts", "author"));
        assert!(!sets.allows("posts", "content"));
    }

    #[test]
    fn field_sets_later_pair_replaces() {
        let sets = FieldSets::from_pairs([("posts", "title"), ("posts", "content")]);
        assert_eq!(sets.len(), 1);
        assert!(sets.allows("posts", "content"));
        assert!(!sets.allows("posts", "title"));
    }

    #[test]
    fn field_sets_builder() {
        let sets = FieldSets::new()
            .with("posts", FieldSet::new(["title"]))
            .with("users", FieldSet::default());
        let types: Vec<&str> = sets.types().collect();
        assert_eq!(types, vec!["posts", "users"]);
    }
}
