//! Per-request lookup index over include paths and sparse fieldsets

use jsonapi_path::{FieldSets, IncludePaths};
use std::collections::{HashMap, HashSet};

/// Constant-time answers to "is this relationship included here" and
/// "is this field requested for this type" during one walk
///
/// Built once per encode call and never shared.
#[derive(Debug, Clone, Default)]
pub struct SchemaFields {
    relationships_at_path: HashMap<String, HashSet<String>>,
    fields_for_type: HashMap<String, HashSet<String>>,
}

impl SchemaFields {
    /// Index the request's include paths and fieldsets
    #[must_use]
    pub fn new(include: &IncludePaths, fields: &FieldSets) -> Self {
        let mut relationships_at_path: HashMap<String, HashSet<String>> = HashMap::new();
        for path in include {
            for (k, segment) in path.iter().enumerate() {
                relationships_at_path
                    .entry(path.take_string(k))
                    .or_default()
                    .insert(segment.to_string());
            }
        }

        let fields_for_type = fields
            .iter()
            .map(|(resource_type, set)| {
                (
                    resource_type.to_string(),
                    set.iter().map(str::to_string).collect(),
                )
            })
            .collect();

        Self {
            relationships_at_path,
            fields_for_type,
        }
    }

    /// Check if `name` is included at the traversal position `path`
    ///
    /// The root position is the empty string.
    #[must_use]
    pub fn is_relationship_requested(&self, path: &str, name: &str) -> bool {
        self.relationships_at_path
            .get(path)
            .is_some_and(|names| names.contains(name))
    }

    /// Check if any relationship is included below the traversal position `path`
    #[must_use]
    pub fn has_requested_relationships(&self, path: &str) -> bool {
        self.relationships_at_path
            .get(path)
            .is_some_and(|names| !names.is_empty())
    }

    /// Check if `field` of `resource_type` should be serialized
    ///
    /// Types without a fieldset are unrestricted.
    #[must_use]
    pub fn is_field_requested(&self, resource_type: &str, field: &str) -> bool {
        self.fields_for_type
            .get(resource_type)
            .map_or(true, |fields| fields.contains(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationships_indexed_by_prefix() {
        let include: IncludePaths = "author.posts,comments.author,tags".parse().unwrap();
        let index = SchemaFields::new(&include, &FieldSets::new());

        assert!(index.is_relationship_requested("", "author"));
        assert!(index.is_relationship_requested("", "comments"));
        assert!(index.is_relationship_requested("", "tags"));
        assert!(index.is_relationship_requested("author", "posts"));
        assert!(index.is_relationship_requested("comments", "author"));

        assert!(!index.is_relationship_requested("", "posts"));
        assert!(!index.is_relationship_requested("author", "author"));
        assert!(!index.is_relationship_requested("author.posts", "author"));

        assert!(index.has_requested_relationships(""));
        assert!(index.has_requested_relationships("comments"));
        assert!(!index.has_requested_relationships("tags"));
        assert!(!index.has_requested_relationships("author.posts"));
    }

    #[test]
    fn fieldset_asymmetry() {
        let fields = FieldSets::from_pairs([("posts", "title"), ("tags", "")]);
        let index = SchemaFields::new(&IncludePaths::none(), &fields);

        assert!(index.is_field_requested("posts", "title"));
        assert!(!index.is_field_requested("posts", "content"));
        assert!(!index.is_field_requested("tags", "label"));
        assert!(index.is_field_requested("users", "name"));
    }

    #[test]
    fn empty_request() {
        let index = SchemaFields::default();
        assert!(!index.is_relationship_requested("", "author"));
        assert!(index.is_field_requested("posts", "title"));
    }
}
