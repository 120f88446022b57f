//! Resource identifier objects

use crate::links::Meta;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// `(type, id)` reference to a resource, with optional meta
///
/// Equality and hashing only consider `type` and `id`, so identifiers are
/// the deduplication key for `included`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    resource_type: String,
    id: String,
    #[serde(default, skip_serializing_if = "Meta::is_empty")]
    meta: Meta,
}

impl ResourceIdentifier {
    /// Create identifier
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            meta: Meta::new(),
        }
    }

    /// Attach identifier meta
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Resource type
    #[inline]
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Resource id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier meta
    #[inline]
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type && self.id == other.id
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type.hash(state);
        self.id.hash(state);
    }
}

impl Display for ResourceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn identifier_equality_ignores_meta() {
        let plain = ResourceIdentifier::new("users", "5");
        let with_meta =
            ResourceIdentifier::new("users", "5").with_meta(Meta::new().with("role", json!("owner")));

        assert_eq!(plain, with_meta);

        let mut set = HashSet::new();
        set.insert(plain);
        assert!(!set.insert(with_meta));
    }

    #[test]
    fn identifier_serialization() {
        let id = ResourceIdentifier::new("tags", "1");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!({"type": "tags", "id": "1"})
        );

        let id = id.with_meta(Meta::new().with("primary", json!(true)));
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!({"type": "tags", "id": "1", "meta": {"primary": true}})
        );
    }

    #[test]
    fn identifier_display() {
        assert_eq!(ResourceIdentifier::new("posts", "1").to_string(), "posts:1");
    }
}
