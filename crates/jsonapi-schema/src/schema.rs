//! Resource schema descriptor

use crate::container::SchemaContainer;
use crate::error::{SchemaError, SchemaResult};
use crate::expander::IncludePathExpander;
use crate::field::{Attribute, Field, Filter, Pagination, Relationship};
use indexmap::IndexMap;
use jsonapi_path::{IncludePaths, SortFields};

/// Names a schema may not declare as fields
const RESERVED_FIELDS: [&str; 2] = ["type", "id"];

/// Depth used when a schema does not declare one
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Static description of one resource type
///
/// Fields keep declaration order; include-path expansion and the encoder
/// both walk relationships in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    resource_type: String,
    fields: IndexMap<String, Field>,
    sortable_id: bool,
    filters: Vec<Filter>,
    pagination: Option<Pagination>,
    max_depth: usize,
    default_include: IncludePaths,
    default_sort: SortFields,
}

impl Schema {
    /// Start describing a resource type
    #[must_use]
    pub fn builder(resource_type: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(resource_type)
    }

    /// Resource type name
    #[inline]
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// All fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub(crate) fn fields_raw(&self) -> indexmap::map::Values<'_, String, Field> {
        self.fields.values()
    }

    /// Look up a field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Attributes in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.fields.values().filter_map(Field::as_attribute)
    }

    /// Look up an attribute
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.fields.get(name).and_then(Field::as_attribute)
    }

    /// Relationships in declaration order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.fields.values().filter_map(Field::as_relationship)
    }

    /// Look up a relationship
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.fields.get(name).and_then(Field::as_relationship)
    }

    /// Names allowed in `fields[type]`
    #[must_use]
    pub fn sparse_fields(&self) -> Vec<&str> {
        self.fields()
            .filter(|field| field.is_sparse_field())
            .map(Field::name)
            .collect()
    }

    /// Check if a field may appear in `fields[type]`
    #[must_use]
    pub fn is_sparse_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(Field::is_sparse_field)
    }

    /// Names allowed in `sort`, `id` first when sortable
    #[must_use]
    pub fn sortable_fields(&self) -> Vec<&str> {
        let id = self.sortable_id.then_some("id");
        id.into_iter()
            .chain(self.fields().filter(|field| field.is_sortable()).map(Field::name))
            .collect()
    }

    /// Check if `sort` may name this field
    #[must_use]
    pub fn is_sortable(&self, name: &str) -> bool {
        if name == "id" {
            return self.sortable_id;
        }
        self.field(name).is_some_and(Field::is_sortable)
    }

    /// Declared filters
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Keys allowed in `filter[...]`
    #[must_use]
    pub fn filter_keys(&self) -> Vec<&str> {
        self.filters.iter().map(Filter::key).collect()
    }

    /// Check if `filter[key]` is declared
    #[must_use]
    pub fn is_filterable(&self, key: &str) -> bool {
        self.filters.iter().any(|filter| filter.key() == key)
    }

    /// Pagination strategy, if the type can be paged
    #[must_use]
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Deepest include path clients may request
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Include paths applied when the request names none
    #[must_use]
    pub fn default_include_paths(&self) -> &IncludePaths {
        &self.default_include
    }

    /// Sort applied when the request names none
    #[must_use]
    pub fn default_sort(&self) -> &SortFields {
        &self.default_sort
    }

    /// Enumerate include paths up to `depth` segments
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidDepth`] when `depth` is zero
    pub fn include_paths<'a>(
        &'a self,
        container: &'a SchemaContainer,
        depth: usize,
    ) -> SchemaResult<IncludePathExpander<'a>> {
        IncludePathExpander::new(container, self, depth)
    }

    /// Enumerate include paths up to [`Schema::max_depth`]
    #[must_use]
    pub fn allowed_include_paths<'a>(&'a self, container: &'a SchemaContainer) -> IncludePathExpander<'a> {
        IncludePathExpander::at_depth(container, self, self.max_depth)
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    resource_type: String,
    fields: Vec<Field>,
    sortable_id: bool,
    filters: Vec<Filter>,
    pagination: Option<Pagination>,
    max_depth: usize,
    default_include: IncludePaths,
    default_sort: SortFields,
}

impl SchemaBuilder {
    /// Create builder for a resource type
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            fields: Vec::new(),
            sortable_id: false,
            filters: Vec::new(),
            pagination: None,
            max_depth: DEFAULT_MAX_DEPTH,
            default_include: IncludePaths::none(),
            default_sort: SortFields::none(),
        }
    }

    /// Declare a field
    #[must_use]
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Declare an attribute
    #[must_use]
    pub fn attribute(self, attribute: Attribute) -> Self {
        self.field(attribute)
    }

    /// Declare a relationship
    #[must_use]
    pub fn relationship(self, relationship: Relationship) -> Self {
        self.field(relationship)
    }

    /// Allow `sort=id`
    #[must_use]
    pub fn sortable_id(mut self) -> Self {
        self.sortable_id = true;
        self
    }

    /// Declare a `filter[key]`
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>) -> Self {
        self.filters.push(Filter::new(key));
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Set the deepest include path clients may request
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set include paths used when the request names none
    #[must_use]
    pub fn default_include(mut self, paths: IncludePaths) -> Self {
        self.default_include = paths;
        self
    }

    /// Set sort used when the request names none
    #[must_use]
    pub fn default_sort(mut self, sort: SortFields) -> Self {
        self.default_sort = sort;
        self
    }

    /// Validate field names and depth
    ///
    /// Default include paths and relationship inverses need the other
    /// schemas and are checked by [`SchemaContainer`] instead.
    ///
    /// # Errors
    /// Returns error on a zero depth, a reserved or duplicated field name,
    /// or a default sort field that is not sortable
    pub fn build(self) -> SchemaResult<Schema> {
        if self.max_depth == 0 {
            return Err(SchemaError::InvalidDepth(0));
        }

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            let name = field.name().to_string();
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(SchemaError::ReservedField {
                    resource_type: self.resource_type,
                    field: name,
                });
            }
            if fields.contains_key(&name) {
                return Err(SchemaError::DuplicateField {
                    resource_type: self.resource_type,
                    field: name,
                });
            }
            fields.insert(name, field);
        }

        let schema = Schema {
            resource_type: self.resource_type,
            fields,
            sortable_id: self.sortable_id,
            filters: self.filters,
            pagination: self.pagination,
            max_depth: self.max_depth,
            default_include: self.default_include,
            default_sort: self.default_sort,
        };

        if let Some(field) = schema.default_sort.names().find(|name| !schema.is_sortable(name)) {
            return Err(SchemaError::InvalidDefaultSort {
                resource_type: schema.resource_type.clone(),
                field: field.to_string(),
            });
        }

        Ok(schema)
    }
}
