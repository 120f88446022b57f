//! Resource graph model
//!
//! Domain records are exposed to the encoder by implementing
//! [`JsonApiResource`]. Values are described rather than computed: lazy
//! attributes and relation data are only evaluated when the request
//! actually needs them.

use jsonapi_document::{Links, Meta, ResourceIdentifier};
use jsonapi_schema::Cardinality;
use serde_json::Value;

/// Deferred boolean for conditional attributes
pub type Condition<'a> = Box<dyn FnOnce() -> bool + 'a>;

/// A node of the resource graph
pub trait JsonApiResource {
    /// Resource type (`posts`)
    fn resource_type(&self) -> &str;

    /// Resource id; `None` makes the node unencodable
    fn id(&self) -> Option<String>;

    /// Attributes in output order
    fn attributes(&self) -> Attributes<'_> {
        Attributes::new()
    }

    /// Relationships in output order
    fn relationships(&self) -> Vec<Relation<'_>> {
        Vec::new()
    }

    /// Resource-level links
    fn links(&self) -> Links {
        Links::new()
    }

    /// Resource-level meta
    fn meta(&self) -> Meta {
        Meta::new()
    }

    /// Canonical URL of this resource
    ///
    /// Used as `links.self` and as the base of default relationship links.
    fn self_link(&self) -> Option<String> {
        None
    }

    /// Identifier, if the node has an id
    fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id()
            .map(|id| ResourceIdentifier::new(self.resource_type(), id))
    }
}

impl<T: JsonApiResource + ?Sized> JsonApiResource for &T {
    fn resource_type(&self) -> &str {
        (**self).resource_type()
    }

    fn id(&self) -> Option<String> {
        (**self).id()
    }

    fn attributes(&self) -> Attributes<'_> {
        (**self).attributes()
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        (**self).relationships()
    }

    fn links(&self) -> Links {
        (**self).links()
    }

    fn meta(&self) -> Meta {
        (**self).meta()
    }

    fn self_link(&self) -> Option<String> {
        (**self).self_link()
    }
}

/// Attribute value description
pub enum AttrValue<'a> {
    /// Ready value
    Value(Value),

    /// Computed only if the attribute is requested
    Lazy(Box<dyn FnOnce() -> Value + 'a>),

    /// Emitted only if the condition holds
    If(Condition<'a>, Box<AttrValue<'a>>),

    /// Splice these attributes in if the condition holds
    ///
    /// Each spliced attribute is subject to sparse fieldsets on its own.
    MergeIf(Condition<'a>, Vec<(String, AttrValue<'a>)>),

    /// Never emitted
    Skip,
}

impl<'a> AttrValue<'a> {
    /// Ready value
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Value computed on demand
    #[must_use]
    pub fn lazy(f: impl FnOnce() -> Value + 'a) -> Self {
        Self::Lazy(Box::new(f))
    }

    /// Value emitted only when `condition` is true
    #[must_use]
    pub fn when(condition: bool, value: impl Into<AttrValue<'a>>) -> Self {
        Self::If(Box::new(move || condition), Box::new(value.into()))
    }

    /// Value emitted only when `condition` evaluates to true
    #[must_use]
    pub fn when_with(condition: impl FnOnce() -> bool + 'a, value: impl Into<AttrValue<'a>>) -> Self {
        Self::If(Box::new(condition), Box::new(value.into()))
    }

    /// Resolve to a value, `None` when nothing should be emitted
    ///
    /// A `MergeIf` resolves to `None` here; splicing is the encoder's job.
    #[must_use]
    pub fn resolve(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Lazy(f) => Some(f()),
            Self::If(condition, value) => {
                if condition() {
                    value.resolve()
                } else {
                    None
                }
            }
            Self::MergeIf(..) | Self::Skip => None,
        }
    }
}

impl std::fmt::Debug for AttrValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::If(_, value) => f.debug_tuple("If").field(&"..").field(value).finish(),
            Self::MergeIf(_, entries) => f.debug_tuple("MergeIf").field(&"..").field(entries).finish(),
            Self::Skip => f.write_str("Skip"),
        }
    }
}

impl From<Value> for AttrValue<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Ordered attribute list returned by [`JsonApiResource::attributes`]
#[derive(Debug, Default)]
pub struct Attributes<'a> {
    entries: Vec<(String, AttrValue<'a>)>,
}

impl<'a> Attributes<'a> {
    /// Empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute description
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: AttrValue<'a>) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    /// Add a ready value
    #[must_use]
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(name, AttrValue::value(value))
    }

    /// Add a value computed on demand
    #[must_use]
    pub fn lazy(self, name: impl Into<String>, f: impl FnOnce() -> Value + 'a) -> Self {
        self.with(name, AttrValue::lazy(f))
    }

    /// Add a value emitted only when `condition` is true
    #[must_use]
    pub fn when(self, name: impl Into<String>, condition: bool, value: impl Into<AttrValue<'a>>) -> Self {
        self.with(name, AttrValue::when(condition, value))
    }

    /// Splice `entries` in when `condition` is true
    #[must_use]
    pub fn merge_when(mut self, condition: bool, entries: Attributes<'a>) -> Self {
        let label = format!("merge#{}", self.entries.len());
        self.entries.push((
            label,
            AttrValue::MergeIf(Box::new(move || condition), entries.entries),
        ));
        self
    }

    /// Add an attribute that is never emitted
    #[must_use]
    pub fn skip(self, name: impl Into<String>) -> Self {
        self.with(name, AttrValue::Skip)
    }

    /// Number of entries, merges counting once
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for Attributes<'a> {
    type Item = (String, AttrValue<'a>);
    type IntoIter = std::vec::IntoIter<(String, AttrValue<'a>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, S: Into<String>> FromIterator<(S, AttrValue<'a>)> for Attributes<'a> {
    fn from_iter<I: IntoIterator<Item = (S, AttrValue<'a>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

/// Related data of a relationship
pub enum RelationData<'a> {
    /// One related resource node, walkable for inclusion
    Resource(Box<dyn JsonApiResource + 'a>),

    /// Related resource nodes, walkable for inclusion
    Resources(Vec<Box<dyn JsonApiResource + 'a>>),

    /// One related identifier, never included
    Identifier(ResourceIdentifier),

    /// Related identifiers, never included
    Identifiers(Vec<ResourceIdentifier>),

    /// Computed only if linkage is emitted
    Lazy(Box<dyn FnOnce() -> RelationData<'a> + 'a>),

    /// Empty to-one linkage (`null`), or empty to-many linkage (`[]`)
    Null,

    /// Linkage never emitted
    Omitted,
}

impl<'a> RelationData<'a> {
    /// Single related node
    #[must_use]
    pub fn resource(node: impl JsonApiResource + 'a) -> Self {
        Self::Resource(Box::new(node))
    }

    /// Related nodes
    #[must_use]
    pub fn resources<R, I>(nodes: I) -> Self
    where
        R: JsonApiResource + 'a,
        I: IntoIterator<Item = R>,
    {
        Self::Resources(
            nodes
                .into_iter()
                .map(|node| Box::new(node) as Box<dyn JsonApiResource + 'a>)
                .collect(),
        )
    }
}

impl std::fmt::Debug for RelationData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource(node) => f
                .debug_tuple("Resource")
                .field(&node.identifier())
                .finish(),
            Self::Resources(nodes) => f
                .debug_tuple("Resources")
                .field(&nodes.iter().map(|node| node.identifier()).collect::<Vec<_>>())
                .finish(),
            Self::Identifier(id) => f.debug_tuple("Identifier").field(id).finish(),
            Self::Identifiers(ids) => f.debug_tuple("Identifiers").field(ids).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::Null => f.write_str("Null"),
            Self::Omitted => f.write_str("Omitted"),
        }
    }
}

/// One relationship of a resource node
#[derive(Debug)]
pub struct Relation<'a> {
    name: String,
    cardinality: Cardinality,
    data: RelationData<'a>,
    show_data_always: bool,
    links: Links,
    meta: Meta,
    self_link: bool,
    related_link: bool,
}

impl<'a> Relation<'a> {
    /// Relationship with no data yet
    #[must_use]
    pub fn new(name: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            data: RelationData::Omitted,
            show_data_always: false,
            links: Links::new(),
            meta: Meta::new(),
            self_link: true,
            related_link: true,
        }
    }

    /// To-one relationship
    #[must_use]
    pub fn to_one(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::ToOne)
    }

    /// To-many relationship
    #[must_use]
    pub fn to_many(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::ToMany)
    }

    /// Set the related data
    #[must_use]
    pub fn data(mut self, data: RelationData<'a>) -> Self {
        self.data = data;
        self
    }

    /// Related resource node
    #[must_use]
    pub fn resource(self, node: impl JsonApiResource + 'a) -> Self {
        self.data(RelationData::resource(node))
    }

    /// Optional related resource node, `null` linkage when absent
    #[must_use]
    pub fn optional_resource<R: JsonApiResource + 'a>(self, node: Option<R>) -> Self {
        match node {
            Some(node) => self.resource(node),
            None => self.data(RelationData::Null),
        }
    }

    /// Related resource nodes
    #[must_use]
    pub fn resources<R, I>(self, nodes: I) -> Self
    where
        R: JsonApiResource + 'a,
        I: IntoIterator<Item = R>,
    {
        self.data(RelationData::resources(nodes))
    }

    /// Related data computed only when linkage is emitted
    #[must_use]
    pub fn lazy(self, f: impl FnOnce() -> RelationData<'a> + 'a) -> Self {
        self.data(RelationData::Lazy(Box::new(f)))
    }

    /// Emit linkage even when the relationship is not included
    #[must_use]
    pub fn show_data_always(mut self) -> Self {
        self.show_data_always = true;
        self
    }

    /// Relationship links; these win over generated defaults
    #[must_use]
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    /// Relationship meta
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Do not generate `links.self`
    #[must_use]
    pub fn without_self_link(mut self) -> Self {
        self.self_link = false;
        self
    }

    /// Do not generate `links.related`
    #[must_use]
    pub fn without_related_link(mut self) -> Self {
        self.related_link = false;
        self
    }

    /// Relationship name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// To-one or to-many
    #[inline]
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Check if linkage is emitted regardless of inclusion
    #[inline]
    #[must_use]
    pub fn is_data_always_shown(&self) -> bool {
        self.show_data_always
    }

    pub(crate) fn into_parts(self) -> RelationParts<'a> {
        RelationParts {
            name: self.name,
            cardinality: self.cardinality,
            data: self.data,
            show_data_always: self.show_data_always,
            links: self.links,
            meta: self.meta,
            self_link: self.self_link,
            related_link: self.related_link,
        }
    }
}

pub(crate) struct RelationParts<'a> {
    pub(crate) name: String,
    pub(crate) cardinality: Cardinality,
    pub(crate) data: RelationData<'a>,
    pub(crate) show_data_always: bool,
    pub(crate) links: Links,
    pub(crate) meta: Meta,
    pub(crate) self_link: bool,
    pub(crate) related_link: bool,
}
