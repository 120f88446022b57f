//! Resource and relationship objects

use crate::identifier::ResourceIdentifier;
use crate::links::{Links, Meta};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Full representation of one resource
///
/// `attributes`, `relationships`, `links` and `meta` are omitted from the
/// wire format when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    /// Resource type
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource id
    pub id: String,

    /// Serialized attributes in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Value>,

    /// Relationship objects in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, RelationshipObject>,

    /// Resource links
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Resource meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl ResourceObject {
    /// Resource object with identity only
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
            links: Links::new(),
            meta: Meta::new(),
        }
    }

    /// Identifier of this resource
    #[must_use]
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(&self.resource_type, &self.id)
    }
}

/// Relationship linkage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// Empty to-one relationship
    Null,

    /// To-one relationship
    ToOne(ResourceIdentifier),

    /// To-many relationship (possibly empty)
    ToMany(Vec<ResourceIdentifier>),
}

impl RelationshipData {
    /// Identifiers referenced by this linkage
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            Self::Null => &[],
            Self::ToOne(id) => std::slice::from_ref(id),
            Self::ToMany(ids) => ids,
        }
    }
}

/// Relationship object
///
/// `data` is only present when the linkage was requested or forced; a
/// present-but-empty to-one relationship serializes as `"data": null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationshipObject {
    /// Resource linkage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,

    /// Relationship links (`self`, `related`)
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Relationship meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl RelationshipObject {
    /// Check if nothing would be serialized
    ///
    /// JSON:API requires at least one of `data`, `links` or `meta`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.links.is_empty() && self.meta.is_empty()
    }
}
