//! Read-only schema registry

use crate::definition::RegistryDefinition;
use crate::error::{SchemaError, SchemaResult};
use crate::schema::Schema;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Registry of every resource schema, keyed by type
///
/// Built once through [`SchemaContainerBuilder`], which checks that every
/// relationship points at a registered type. Immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContainer {
    schemas: IndexMap<String, Schema>,
}

impl SchemaContainer {
    /// Start a two-phase build
    #[must_use]
    pub fn builder() -> SchemaContainerBuilder {
        SchemaContainerBuilder::default()
    }

    /// Build from declarative definitions
    ///
    /// # Errors
    /// Returns error if any definition is invalid or the registry is
    /// inconsistent
    pub fn from_definitions(definition: RegistryDefinition) -> SchemaResult<Self> {
        let mut builder = Self::builder();
        for schema in definition.schemas {
            builder = builder.register(schema.into_schema()?);
        }
        builder.build()
    }

    /// Schema for a resource type
    ///
    /// # Errors
    /// Returns [`SchemaError::UnknownType`] if the type is not registered
    pub fn schema_for(&self, resource_type: &str) -> SchemaResult<&Schema> {
        self.get(resource_type)
            .ok_or_else(|| SchemaError::UnknownType(resource_type.to_string()))
    }

    /// Schema for a resource type, if registered
    #[inline]
    #[must_use]
    pub fn get(&self, resource_type: &str) -> Option<&Schema> {
        self.schemas.get(resource_type)
    }

    /// Check if a type is registered
    #[inline]
    #[must_use]
    pub fn exists(&self, resource_type: &str) -> bool {
        self.schemas.contains_key(resource_type)
    }

    /// Registered types in registration order
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Iterate over schemas
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Number of registered schemas
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Collects schemas, then validates them as a whole
#[derive(Debug, Default)]
pub struct SchemaContainerBuilder {
    schemas: Vec<Schema>,
}

impl SchemaContainerBuilder {
    /// Add a schema
    #[must_use]
    pub fn register(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Add several schemas
    #[must_use]
    pub fn register_all(mut self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    /// Freeze the registry
    ///
    /// # Errors
    /// Returns error on a duplicated type, a relationship to an unknown
    /// type, or a default include path the schema does not allow
    pub fn build(self) -> SchemaResult<SchemaContainer> {
        let mut schemas = IndexMap::with_capacity(self.schemas.len());
        for schema in self.schemas {
            let resource_type = schema.resource_type().to_string();
            if schemas.contains_key(&resource_type) {
                return Err(SchemaError::DuplicateType(resource_type));
            }
            schemas.insert(resource_type, schema);
        }
        let container = SchemaContainer { schemas };

        for schema in container.iter() {
            if let Some(rel) = schema.relationships().find(|rel| !container.exists(rel.inverse())) {
                return Err(SchemaError::UnknownInverse {
                    resource_type: schema.resource_type().to_string(),
                    relationship: rel.name().to_string(),
                    inverse: rel.inverse().to_string(),
                });
            }
        }

        for schema in container.iter() {
            validate_default_include(&container, schema)?;
        }

        debug!(schemas = container.len(), "Schema registry built");
        Ok(container)
    }
}

fn validate_default_include(container: &SchemaContainer, schema: &Schema) -> SchemaResult<()> {
    let defaults = schema.default_include_paths();
    if defaults.is_empty() {
        return Ok(());
    }

    let allowed: HashSet<String> = schema.allowed_include_paths(container).iter().collect();
    match defaults.iter().find(|path| !allowed.contains(&path.to_string())) {
        Some(path) => Err(SchemaError::InvalidDefaultInclude {
            resource_type: schema.resource_type().to_string(),
            path: path.to_string(),
        }),
        None => Ok(()),
    }
}
