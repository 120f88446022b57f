//! Encoder configuration

use jsonapi_document::{JsonApiObject, Meta, JSONAPI_VERSION};
use serde::{Deserialize, Serialize};

/// Settings shared by every document an [`Encoder`](crate::Encoder) builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Version announced in the `jsonapi` member; `None` omits it
    pub version: Option<String>,

    /// Meta attached to the `jsonapi` member
    pub jsonapi_meta: Meta,

    /// Prefix for default resource `self` links (`{base_uri}/{type}/{id}`)
    pub base_uri: Option<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            version: Some(JSONAPI_VERSION.to_string()),
            jsonapi_meta: Meta::new(),
            base_uri: None,
        }
    }
}

impl EncoderConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a different version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Stop announcing a version
    #[must_use]
    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    /// Set `jsonapi.meta`
    #[must_use]
    pub fn with_jsonapi_meta(mut self, meta: Meta) -> Self {
        self.jsonapi_meta = meta;
        self
    }

    /// Generate resource `self` links under this URI
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Top-level `jsonapi` member, if anything is configured for it
    #[must_use]
    pub fn jsonapi_object(&self) -> Option<JsonApiObject> {
        let object = JsonApiObject {
            version: self.version.clone(),
            meta: self.jsonapi_meta.clone(),
        };
        (!object.is_empty()).then_some(object)
    }

    pub(crate) fn resource_link(&self, resource_type: &str, id: &str) -> Option<String> {
        self.base_uri
            .as_deref()
            .map(|base| format!("{}/{resource_type}/{id}", base.trim_end_matches('/')))
    }
}
