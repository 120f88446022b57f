//! Field descriptors: attributes and relationships

use serde::{Deserialize, Serialize};

/// Attribute descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    sortable: bool,
    sparse_field: bool,
}

impl Attribute {
    /// Attribute that can be requested in sparse fieldsets but not sorted
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sortable: false,
            sparse_field: true,
        }
    }

    /// Allow sorting on this attribute
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Exclude from `fields[type]` allow-lists
    #[must_use]
    pub fn not_sparse_field(mut self) -> Self {
        self.sparse_field = false;
        self
    }

    /// Attribute name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if sorting is allowed
    #[inline]
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Check if it may appear in a sparse fieldset
    #[inline]
    #[must_use]
    pub fn is_sparse_field(&self) -> bool {
        self.sparse_field
    }
}

/// Number of resources on the far side of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Zero or one related resource
    ToOne,

    /// Any number of related resources
    ToMany,
}

/// Relationship descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    name: String,
    inverse: String,
    cardinality: Cardinality,
    include_path: bool,
    sparse_field: bool,
}

impl Relationship {
    /// Create a relationship to resources of type `inverse`
    #[must_use]
    pub fn new(name: impl Into<String>, inverse: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            inverse: inverse.into(),
            cardinality,
            include_path: true,
            sparse_field: true,
        }
    }

    /// To-one relationship
    #[must_use]
    pub fn to_one(name: impl Into<String>, inverse: impl Into<String>) -> Self {
        Self::new(name, inverse, Cardinality::ToOne)
    }

    /// To-many relationship
    #[must_use]
    pub fn to_many(name: impl Into<String>, inverse: impl Into<String>) -> Self {
        Self::new(name, inverse, Cardinality::ToMany)
    }

    /// Forbid `include` through this relationship
    #[must_use]
    pub fn not_include_path(mut self) -> Self {
        self.include_path = false;
        self
    }

    /// Exclude from `fields[type]` allow-lists
    #[must_use]
    pub fn not_sparse_field(mut self) -> Self {
        self.sparse_field = false;
        self
    }

    /// Relationship name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource type of related resources
    #[inline]
    #[must_use]
    pub fn inverse(&self) -> &str {
        &self.inverse
    }

    /// To-one or to-many
    #[inline]
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Check for a to-one relationship
    #[inline]
    #[must_use]
    pub fn is_to_one(&self) -> bool {
        self.cardinality == Cardinality::ToOne
    }

    /// Check for a to-many relationship
    #[inline]
    #[must_use]
    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }

    /// Check if clients may include related resources
    #[inline]
    #[must_use]
    pub fn is_include_path(&self) -> bool {
        self.include_path
    }

    /// Check if it may appear in a sparse fieldset
    #[inline]
    #[must_use]
    pub fn is_sparse_field(&self) -> bool {
        self.sparse_field
    }
}

/// Any declared field of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Attribute field
    Attribute(Attribute),

    /// Relationship field
    Relationship(Relationship),
}

impl Field {
    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attr) => attr.name(),
            Self::Relationship(rel) => rel.name(),
        }
    }

    /// Check if it may appear in a sparse fieldset
    #[must_use]
    pub fn is_sparse_field(&self) -> bool {
        match self {
            Self::Attribute(attr) => attr.is_sparse_field(),
            Self::Relationship(rel) => rel.is_sparse_field(),
        }
    }

    /// Check if sorting is allowed (relationships never are)
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        match self {
            Self::Attribute(attr) => attr.is_sortable(),
            Self::Relationship(_) => false,
        }
    }

    /// Attribute descriptor, if this is one
    #[must_use]
    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Self::Attribute(attr) => Some(attr),
            Self::Relationship(_) => None,
        }
    }

    /// Relationship descriptor, if this is one
    #[must_use]
    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Self::Relationship(rel) => Some(rel),
            Self::Attribute(_) => None,
        }
    }
}

impl From<Attribute> for Field {
    fn from(attr: Attribute) -> Self {
        Self::Attribute(attr)
    }
}

impl From<Relationship> for Field {
    fn from(rel: Relationship) -> Self {
        Self::Relationship(rel)
    }
}

/// Declared filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    key: String,
}

impl Filter {
    /// Filter on `filter[key]`
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Query key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Pagination strategy and the `page[...]` keys it understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pagination {
    /// Page-number pagination (`page[number]`, `page[size]`)
    Page {
        #[serde(default = "default_number_key")]
        number_key: String,
        #[serde(default = "default_size_key")]
        size_key: String,
    },

    /// Cursor pagination (`page[after]`, `page[before]`, `page[limit]`)
    Cursor {
        #[serde(default = "default_after_key")]
        after_key: String,
        #[serde(default = "default_before_key")]
        before_key: String,
        #[serde(default = "default_limit_key")]
        limit_key: String,
    },
}

fn default_number_key() -> String {
    "number".to_string()
}

fn default_size_key() -> String {
    "size".to_string()
}

fn default_after_key() -> String {
    "after".to_string()
}

fn default_before_key() -> String {
    "before".to_string()
}

fn default_limit_key() -> String {
    "limit".to_string()
}

impl Pagination {
    /// Page-number pagination with standard keys
    #[must_use]
    pub fn page() -> Self {
        Self::Page {
            number_key: default_number_key(),
            size_key: default_size_key(),
        }
    }

    /// Cursor pagination with standard keys
    #[must_use]
    pub fn cursor() -> Self {
        Self::Cursor {
            after_key: default_after_key(),
            before_key: default_before_key(),
            limit_key: default_limit_key(),
        }
    }

    /// Keys accepted under `page[...]`
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Page {
                number_key,
                size_key,
            } => vec![number_key, size_key],
            Self::Cursor {
                after_key,
                before_key,
                limit_key,
            } => vec![after_key, before_key, limit_key],
        }
    }
}
