//! Links and meta members

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Free-form `meta` member, ordered by insertion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(IndexMap<String, Value>);

impl Meta {
    /// Empty meta
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add an entry, builder style
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Lookup an entry
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Meta {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single link, serialized as a bare URL unless it carries meta
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    href: String,
    meta: Meta,
}

impl Link {
    /// Link to a URL
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            meta: Meta::new(),
        }
    }

    /// Attach link meta (switches to the link-object form)
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Target URL
    #[inline]
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Link meta
    #[inline]
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Href(String),
    Object {
        href: String,
        #[serde(default, skip_serializing_if = "Meta::is_empty")]
        meta: Meta,
    },
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.meta.is_empty() {
            serializer.serialize_str(&self.href)
        } else {
            LinkRepr::Object {
                href: self.href.clone(),
                meta: self.meta.clone(),
            }
            .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LinkRepr::deserialize(deserializer)? {
            LinkRepr::Href(href) => Self::new(href),
            LinkRepr::Object { href, meta } => Self { href, meta },
        })
    }
}

/// Named links (`self`, `related`, `first`, ...), ordered by insertion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(IndexMap<String, Link>);

impl Links {
    /// No links
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a link, builder style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, link: Link) -> Self {
        self.insert(name, link);
        self
    }

    /// Add or replace a link
    pub fn insert(&mut self, name: impl Into<String>, link: Link) {
        self.0.insert(name.into(), link);
    }

    /// Add a link only if the name is not taken yet
    pub fn insert_missing(&mut self, name: impl Into<String>, link: Link) {
        self.0.entry(name.into()).or_insert(link);
    }

    /// Lookup a link
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Link> {
        self.0.get(name)
    }

    /// Check for a named link
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of links
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for no links
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate links in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
