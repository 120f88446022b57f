//! Compound document encoding
//!
//! One encode call walks the resource graph depth-first. At traversal
//! position `P` (the dotted include path leading to the current node, empty
//! at the root) a relationship's related resources are included only if the
//! request asked for it at `P`. Every `(type, id)` is emitted once: primary
//! data first, then `included` in walk order.

use crate::config::EncoderConfig;
use crate::error::{DocumentStructureError, EncodeResult};
use crate::resource::{AttrValue, JsonApiResource, RelationData, RelationParts};
use crate::schema_fields::SchemaFields;
use indexmap::IndexMap;
use jsonapi_document::{
    CompoundDocument, Link, Links, Meta, PrimaryData, RelationshipData, RelationshipObject,
    ResourceIdentifier, ResourceObject,
};
use jsonapi_path::{FieldSets, IncludePaths};
use jsonapi_schema::Cardinality;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Primary data handed to [`DocumentBuilder::encode`]
pub enum Data<'a> {
    /// Single resource (`GET /posts/1`)
    Resource(&'a dyn JsonApiResource),

    /// Collection (`GET /posts`)
    Resources(Vec<&'a dyn JsonApiResource>),

    /// To-one relationship endpoint
    Identifier(ResourceIdentifier),

    /// To-many relationship endpoint
    Identifiers(Vec<ResourceIdentifier>),

    /// Missing resource (`"data": null`)
    Null,
}

impl std::fmt::Debug for Data<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource(node) => f.debug_tuple("Resource").field(&node.identifier()).finish(),
            Self::Resources(nodes) => f.debug_tuple("Resources").field(&nodes.len()).finish(),
            Self::Identifier(id) => f.debug_tuple("Identifier").field(id).finish(),
            Self::Identifiers(ids) => f.debug_tuple("Identifiers").field(ids).finish(),
            Self::Null => f.write_str("Null"),
        }
    }
}

/// Long-lived encoder; cheap to share between requests
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Create encoder with configuration
    #[must_use]
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Start a document for one request
    #[must_use]
    pub fn document(&self) -> DocumentBuilder<'_> {
        DocumentBuilder {
            config: &self.config,
            include: IncludePaths::none(),
            fields: FieldSets::new(),
            links: Links::new(),
            meta: Meta::new(),
        }
    }
}

/// Request-scoped document options, consumed by a finishing call
#[derive(Debug)]
pub struct DocumentBuilder<'e> {
    config: &'e EncoderConfig,
    include: IncludePaths,
    fields: FieldSets,
    links: Links,
    meta: Meta,
}

impl DocumentBuilder<'_> {
    /// Relationships to compound into `included`
    #[must_use]
    pub fn with_include_paths(mut self, include: IncludePaths) -> Self {
        self.include = include;
        self
    }

    /// Sparse fieldsets
    #[must_use]
    pub fn with_field_sets(mut self, fields: FieldSets) -> Self {
        self.fields = fields;
        self
    }

    /// Top-level links
    #[must_use]
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    /// Top-level meta
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Encode a single resource
    ///
    /// # Errors
    /// Returns [`EncodeError::DocumentStructure`](crate::EncodeError::DocumentStructure)
    /// if the graph cannot be represented
    pub fn resource<R: JsonApiResource>(self, resource: &R) -> EncodeResult<CompoundDocument> {
        self.encode(Data::Resource(resource))
    }

    /// Encode a collection
    ///
    /// # Errors
    /// Returns [`EncodeError::DocumentStructure`](crate::EncodeError::DocumentStructure)
    /// if the graph cannot be represented
    pub fn resources<'r, R, I>(self, resources: I) -> EncodeResult<CompoundDocument>
    where
        R: JsonApiResource + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let nodes = resources
            .into_iter()
            .map(|node| node as &dyn JsonApiResource)
            .collect();
        self.encode(Data::Resources(nodes))
    }

    /// Encode `"data": null`
    ///
    /// # Errors
    /// Never fails; the signature matches the other finishing calls
    pub fn null(self) -> EncodeResult<CompoundDocument> {
        self.encode(Data::Null)
    }

    /// Encode to-one relationship linkage
    ///
    /// # Errors
    /// Never fails; the signature matches the other finishing calls
    pub fn identifier(self, identifier: ResourceIdentifier) -> EncodeResult<CompoundDocument> {
        self.encode(Data::Identifier(identifier))
    }

    /// Encode to-many relationship linkage
    ///
    /// # Errors
    /// Never fails; the signature matches the other finishing calls
    pub fn identifiers(
        self,
        identifiers: impl IntoIterator<Item = ResourceIdentifier>,
    ) -> EncodeResult<CompoundDocument> {
        self.encode(Data::Identifiers(identifiers.into_iter().collect()))
    }

    /// Encode any primary data
    ///
    /// # Errors
    /// Returns [`EncodeError::DocumentStructure`](crate::EncodeError::DocumentStructure)
    /// if a resource lacks an id, lazy relation data nests, or relation
    /// data contradicts its cardinality
    pub fn encode(self, data: Data<'_>) -> EncodeResult<CompoundDocument> {
        let index = SchemaFields::new(&self.include, &self.fields);
        let mut walk = Walk::new(&index, self.config);

        let (nodes, fixed, single) = match data {
            Data::Null => (Vec::new(), Some(PrimaryData::Null), false),
            Data::Identifier(id) => (Vec::new(), Some(PrimaryData::Identifier(id)), false),
            Data::Identifiers(ids) => (Vec::new(), Some(PrimaryData::Identifiers(ids)), false),
            Data::Resource(node) => (vec![node], None, true),
            Data::Resources(nodes) => (nodes, None, false),
        };

        for &node in &nodes {
            walk.register_primary(node)?;
        }
        let mut objects = nodes
            .into_iter()
            .map(|node| walk.encode_node(node, ""))
            .collect::<EncodeResult<Vec<_>>>()?;
        let included = walk.finish(&mut objects);

        let primary = match fixed {
            Some(data) => data,
            None if single => objects.pop().map_or(PrimaryData::Null, PrimaryData::Resource),
            None => PrimaryData::Resources(objects),
        };

        let mut document = CompoundDocument::new(primary);
        document.included = included;
        document.jsonapi = self.config.jsonapi_object();
        document.links = self.links;
        document.meta = self.meta;

        debug!(
            primary = document.data.identifiers().len(),
            included = document.included.len(),
            "Encoded compound document"
        );
        Ok(document)
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Primary(usize),
    Included(usize),
}

struct Walk<'w> {
    index: &'w SchemaFields,
    config: &'w EncoderConfig,
    slots: HashMap<ResourceIdentifier, Slot>,
    visited: HashSet<(ResourceIdentifier, String)>,
    primary_count: usize,
    // Slots are reserved before a node's relationships are walked so that a
    // parent precedes its own included descendants.
    included: Vec<Option<ResourceObject>>,
    // Linkage found when an emitted resource is reached again at a deeper
    // path; merged once every slot is filled.
    revisits: Vec<(Slot, IndexMap<String, RelationshipObject>)>,
}

impl<'w> Walk<'w> {
    fn new(index: &'w SchemaFields, config: &'w EncoderConfig) -> Self {
        Self {
            index,
            config,
            slots: HashMap::new(),
            visited: HashSet::new(),
            primary_count: 0,
            included: Vec::new(),
            revisits: Vec::new(),
        }
    }
}

impl Walk<'_> {
    fn register_primary(&mut self, node: &dyn JsonApiResource) -> EncodeResult<()> {
        let identifier = identify(node)?;
        let position = self.primary_count;
        self.primary_count += 1;
        self.visited.insert((identifier.clone(), String::new()));
        self.slots.entry(identifier).or_insert(Slot::Primary(position));
        Ok(())
    }

    fn include(&mut self, node: &dyn JsonApiResource, path: &str) -> EncodeResult<()> {
        let identifier = identify(node)?;
        if !self.visited.insert((identifier.clone(), path.to_string())) {
            trace!(resource = %identifier, path, "Already walked at this path, skipping");
            return Ok(());
        }

        if let Some(&slot) = self.slots.get(&identifier) {
            if self.index.has_requested_relationships(path) {
                self.revisit(node, &identifier, slot, path)?;
            } else {
                trace!(resource = %identifier, path, "Already in document, skipping");
            }
            return Ok(());
        }

        let slot = self.included.len();
        self.included.push(None);
        self.slots.insert(identifier, Slot::Included(slot));
        let object = self.encode_node(node, path)?;
        self.included[slot] = Some(object);
        Ok(())
    }

    /// Walk the relationships requested below `path` of a resource that is
    /// already in the document
    fn revisit(
        &mut self,
        node: &dyn JsonApiResource,
        identifier: &ResourceIdentifier,
        slot: Slot,
        path: &str,
    ) -> EncodeResult<()> {
        trace!(resource = %identifier, path, "Already in document, walking new path");
        let self_link = self.self_link(node, identifier);
        let relationships = self.encode_relationships(node, identifier, self_link.as_deref(), path, true)?;
        if !relationships.is_empty() {
            self.revisits.push((slot, relationships));
        }
        Ok(())
    }

    fn finish(self, primary: &mut [ResourceObject]) -> Vec<ResourceObject> {
        let Walk {
            mut included,
            revisits,
            ..
        } = self;

        for (slot, relationships) in revisits {
            let target = match slot {
                Slot::Primary(position) => primary.get_mut(position),
                Slot::Included(position) => included.get_mut(position).and_then(Option::as_mut),
            };
            if let Some(target) = target {
                merge_relationships(&mut target.relationships, relationships);
            }
        }

        included.into_iter().flatten().collect()
    }

    fn encode_node(&mut self, node: &dyn JsonApiResource, path: &str) -> EncodeResult<ResourceObject> {
        let identifier = identify(node)?;
        let resource_type = identifier.resource_type();
        let mut object = ResourceObject::new(resource_type, identifier.id());

        self.encode_attributes(resource_type, node.attributes(), &mut object.attributes);

        let self_link = self.self_link(node, &identifier);
        object.relationships = self.encode_relationships(node, &identifier, self_link.as_deref(), path, false)?;

        object.links = node.links();
        if let Some(href) = self_link {
            object.links.insert_missing("self", Link::new(href));
        }
        object.meta = node.meta();

        Ok(object)
    }

    fn self_link(&self, node: &dyn JsonApiResource, identifier: &ResourceIdentifier) -> Option<String> {
        node.self_link()
            .or_else(|| self.config.resource_link(identifier.resource_type(), identifier.id()))
    }

    /// Encode relationships at `path`; with `only_requested` the ones not
    /// included there are skipped
    fn encode_relationships(
        &mut self,
        node: &dyn JsonApiResource,
        identifier: &ResourceIdentifier,
        self_link: Option<&str>,
        path: &str,
        only_requested: bool,
    ) -> EncodeResult<IndexMap<String, RelationshipObject>> {
        let mut relationships = IndexMap::new();
        for relation in node.relationships() {
            let relation = relation.into_parts();
            if !self.index.is_field_requested(identifier.resource_type(), &relation.name) {
                continue;
            }
            if only_requested && !self.index.is_relationship_requested(path, &relation.name) {
                continue;
            }
            let name = relation.name.clone();
            let relationship = self.encode_relationship(relation, self_link, path)?;
            if !relationship.is_empty() {
                relationships.insert(name, relationship);
            }
        }
        Ok(relationships)
    }

    fn encode_attributes<'a>(
        &self,
        resource_type: &str,
        entries: impl IntoIterator<Item = (String, AttrValue<'a>)>,
        out: &mut IndexMap<String, Value>,
    ) {
        for (name, value) in entries {
            match value {
                AttrValue::MergeIf(condition, spliced) => {
                    if condition() {
                        self.encode_attributes(resource_type, spliced, out);
                    }
                }
                value => {
                    if !self.index.is_field_requested(resource_type, &name) {
                        continue;
                    }
                    if let Some(value) = value.resolve() {
                        out.insert(name, value);
                    }
                }
            }
        }
    }

    fn encode_relationship(
        &mut self,
        relation: RelationParts<'_>,
        self_link: Option<&str>,
        path: &str,
    ) -> EncodeResult<RelationshipObject> {
        let RelationParts {
            name,
            cardinality,
            data,
            show_data_always,
            links,
            meta,
            self_link: default_self,
            related_link: default_related,
        } = relation;

        let requested = self.index.is_relationship_requested(path, &name);
        let mut object = RelationshipObject {
            data: None,
            links,
            meta,
        };

        if requested || show_data_always {
            let data = resolve_lazy(data, &name)?;
            let child = child_path(path, &name);
            object.data = self.linkage(data, cardinality, &name, requested.then_some(child.as_str()))?;
        }

        if let Some(base) = self_link {
            if default_self {
                object
                    .links
                    .insert_missing("self", Link::new(format!("{base}/relationships/{name}")));
            }
            if default_related {
                object
                    .links
                    .insert_missing("related", Link::new(format!("{base}/{name}")));
            }
        }

        Ok(object)
    }

    /// Build linkage, including resource nodes at `include_at` when set
    fn linkage(
        &mut self,
        data: RelationData<'_>,
        cardinality: Cardinality,
        name: &str,
        include_at: Option<&str>,
    ) -> EncodeResult<Option<RelationshipData>> {
        let mismatch = || DocumentStructureError::CardinalityMismatch {
            relationship: name.to_string(),
            expected: cardinality,
        };

        let linkage = match (data, cardinality) {
            (RelationData::Omitted, _) => return Ok(None),
            (RelationData::Null, Cardinality::ToOne) => RelationshipData::Null,
            (RelationData::Null, Cardinality::ToMany) => RelationshipData::ToMany(Vec::new()),
            (RelationData::Identifier(id), Cardinality::ToOne) => RelationshipData::ToOne(id),
            (RelationData::Identifiers(ids), Cardinality::ToMany) => RelationshipData::ToMany(ids),
            (RelationData::Resource(node), Cardinality::ToOne) => {
                let id = identify(node.as_ref())?;
                if let Some(path) = include_at {
                    self.include(node.as_ref(), path)?;
                }
                RelationshipData::ToOne(id)
            }
            (RelationData::Resources(nodes), Cardinality::ToMany) => {
                let mut ids = Vec::with_capacity(nodes.len());
                for node in &nodes {
                    ids.push(identify(node.as_ref())?);
                    if let Some(path) = include_at {
                        self.include(node.as_ref(), path)?;
                    }
                }
                RelationshipData::ToMany(ids)
            }
            (RelationData::Lazy(_), _) => {
                return Err(DocumentStructureError::NestedLazy {
                    relationship: name.to_string(),
                }
                .into())
            }
            _ => return Err(mismatch().into()),
        };

        Ok(Some(linkage))
    }
}

fn identify(node: &dyn JsonApiResource) -> EncodeResult<ResourceIdentifier> {
    node.identifier().ok_or_else(|| {
        DocumentStructureError::MissingId {
            resource_type: node.resource_type().to_string(),
        }
        .into()
    })
}

fn resolve_lazy<'a>(data: RelationData<'a>, name: &str) -> EncodeResult<RelationData<'a>> {
    match data {
        RelationData::Lazy(f) => match f() {
            RelationData::Lazy(_) => Err(DocumentStructureError::NestedLazy {
                relationship: name.to_string(),
            }
            .into()),
            resolved => Ok(resolved),
        },
        data => Ok(data),
    }
}

fn merge_relationships(
    target: &mut IndexMap<String, RelationshipObject>,
    extra: IndexMap<String, RelationshipObject>,
) {
    for (name, relationship) in extra {
        match target.get_mut(&name) {
            Some(existing) => {
                if existing.data.is_none() {
                    existing.data = relationship.data;
                }
            }
            None => {
                target.insert(name, relationship);
            }
        }
    }
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
