//! Declarative schema definitions
//!
//! Lets a registry be described in configuration instead of code:
//!
//! ```toml
//! [[schemas]]
//! type = "posts"
//! max_depth = 2
//! default_include = "author"
//! filters = ["title"]
//! pagination = { kind = "page" }
//! attributes = [{ name = "title", sortable = true }, { name = "content" }]
//! relationships = [{ name = "author", type = "users", cardinality = "to_one" }]
//! ```

use crate::error::{SchemaError, SchemaResult};
use crate::field::{Attribute, Cardinality, Pagination, Relationship};
use crate::schema::{Schema, DEFAULT_MAX_DEPTH};
use jsonapi_path::{IncludePaths, SortFields};
use serde::{Deserialize, Serialize};

/// A whole registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDefinition {
    /// One entry per resource type
    #[serde(default)]
    pub schemas: Vec<SchemaDefinition>,
}

/// One resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Resource type name
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Attributes, in order
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,

    /// Relationships, in order
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,

    /// Allow `sort=id`
    #[serde(default)]
    pub sortable_id: bool,

    /// Declared `filter[...]` keys
    #[serde(default)]
    pub filters: Vec<String>,

    /// Pagination strategy
    #[serde(default)]
    pub pagination: Option<Pagination>,

    /// Deepest allowed include path
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Comma-separated include paths used when none are requested
    #[serde(default)]
    pub default_include: Option<String>,

    /// Sort expression used when none is requested
    #[serde(default)]
    pub default_sort: Option<String>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

/// Attribute entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name
    pub name: String,

    /// Allow sorting
    #[serde(default)]
    pub sortable: bool,

    /// Allow in sparse fieldsets
    #[serde(default = "default_true")]
    pub sparse_field: bool,
}

/// Relationship entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    /// Relationship name
    pub name: String,

    /// Related resource type
    #[serde(rename = "type")]
    pub inverse: String,

    /// To-one or to-many
    pub cardinality: Cardinality,

    /// Allow `include` through it
    #[serde(default = "default_true")]
    pub include_path: bool,

    /// Allow in sparse fieldsets
    #[serde(default = "default_true")]
    pub sparse_field: bool,
}

impl From<AttributeDefinition> for Attribute {
    fn from(def: AttributeDefinition) -> Self {
        let mut attr = Attribute::new(def.name);
        if def.sortable {
            attr = attr.sortable();
        }
        if !def.sparse_field {
            attr = attr.not_sparse_field();
        }
        attr
    }
}

impl From<RelationshipDefinition> for Relationship {
    fn from(def: RelationshipDefinition) -> Self {
        let mut rel = Relationship::new(def.name, def.inverse, def.cardinality);
        if !def.include_path {
            rel = rel.not_include_path();
        }
        if !def.sparse_field {
            rel = rel.not_sparse_field();
        }
        rel
    }
}

impl SchemaDefinition {
    /// Build the schema this entry describes
    ///
    /// # Errors
    /// Returns error if the default include or sort cannot be parsed, or
    /// the schema itself is invalid
    pub fn into_schema(self) -> SchemaResult<Schema> {
        let mut builder = Schema::builder(self.resource_type.clone()).max_depth(self.max_depth);

        for attr in self.attributes {
            builder = builder.attribute(attr.into());
        }
        for rel in self.relationships {
            builder = builder.relationship(rel.into());
        }
        for key in self.filters {
            builder = builder.filter(key);
        }
        if self.sortable_id {
            builder = builder.sortable_id();
        }
        if let Some(pagination) = self.pagination {
            builder = builder.pagination(pagination);
        }

        if let Some(raw) = self.default_include {
            let paths: IncludePaths = raw.parse().map_err(|_| SchemaError::InvalidDefaultInclude {
                resource_type: self.resource_type.clone(),
                path: raw.clone(),
            })?;
            builder = builder.default_include(paths);
        }

        if let Some(raw) = self.default_sort {
            let sort: SortFields = raw.parse().map_err(|_| SchemaError::InvalidDefaultSort {
                resource_type: self.resource_type.clone(),
                field: raw.clone(),
            })?;
            builder = builder.default_sort(sort);
        }

        builder.build()
    }
}
