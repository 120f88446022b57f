//! Top-level compound documents

use crate::identifier::ResourceIdentifier;
use crate::links::{Links, Meta};
use crate::resource::ResourceObject;
use serde::Serialize;

/// Top-level `jsonapi` member
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonApiObject {
    /// Highest JSON:API version supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Implementation meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl JsonApiObject {
    /// Object announcing a version
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            meta: Meta::new(),
        }
    }

    /// Check if nothing would be serialized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.meta.is_empty()
    }
}

/// Primary `data` member
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// No resource (`"data": null`)
    Null,

    /// Single resource object
    Resource(ResourceObject),

    /// Collection of resource objects
    Resources(Vec<ResourceObject>),

    /// Single identifier (to-one relationship endpoint)
    Identifier(ResourceIdentifier),

    /// Identifiers (to-many relationship endpoint)
    Identifiers(Vec<ResourceIdentifier>),
}

impl PrimaryData {
    /// Identifiers of every primary member, in order
    #[must_use]
    pub fn identifiers(&self) -> Vec<ResourceIdentifier> {
        match self {
            Self::Null => Vec::new(),
            Self::Resource(object) => vec![object.identifier()],
            Self::Resources(objects) => objects.iter().map(ResourceObject::identifier).collect(),
            Self::Identifier(id) => vec![id.clone()],
            Self::Identifiers(ids) => ids.clone(),
        }
    }
}

/// Complete JSON:API response document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundDocument {
    /// Version information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,

    /// Primary data
    pub data: PrimaryData,

    /// Side-loaded resources, unique by `(type, id)`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,

    /// Top-level links
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Top-level meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl CompoundDocument {
    /// Document with primary data and nothing else
    #[must_use]
    pub fn new(data: PrimaryData) -> Self {
        Self {
            jsonapi: None,
            data,
            included: Vec::new(),
            links: Links::new(),
            meta: Meta::new(),
        }
    }

    /// Look up an included resource
    #[must_use]
    pub fn find_included(&self, resource_type: &str, id: &str) -> Option<&ResourceObject> {
        self.included
            .iter()
            .find(|object| object.resource_type == resource_type && object.id == id)
    }

    /// Identifiers of included resources, in order
    #[must_use]
    pub fn included_identifiers(&self) -> Vec<ResourceIdentifier> {
        self.included.iter().map(ResourceObject::identifier).collect()
    }

    /// Serialize to a JSON value
    ///
    /// # Errors
    /// Returns error if a user-supplied value cannot be represented as JSON
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Serialize to a JSON string
    ///
    /// # Errors
    /// Returns error if a user-supplied value cannot be represented as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
