//! Allow-list rules
//!
//! Each rule is built once from the schema registry and checks one parsed
//! parameter, collecting every invalid member into a single
//! [`ValidationError`].

use crate::error::{Rule, ValidationError};
use indexmap::{IndexMap, IndexSet};
use jsonapi_path::{FieldSets, IncludePaths, SortFields};
use jsonapi_schema::{Schema, SchemaContainer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A check over one parsed query parameter
pub trait QueryRule<T: ?Sized> {
    /// Validate `value`
    ///
    /// # Errors
    /// Returns a [`ValidationError`] listing every invalid member
    fn check(&self, value: &T) -> Result<(), ValidationError>;
}

fn verdict(rule: Rule, invalid: IndexSet<String>) -> Result<(), ValidationError> {
    if invalid.is_empty() {
        return Ok(());
    }
    let invalid: Vec<String> = invalid.into_iter().collect();
    debug!(rule = rule.key(), invalid = ?invalid, "Query parameter rejected");
    Err(ValidationError::new(rule, invalid))
}

/// `include` must name paths the schema's expansion produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedIncludePaths {
    allowed: HashSet<String>,
}

impl AllowedIncludePaths {
    /// Paths of `schema` up to its `max_depth`
    #[must_use]
    pub fn new(container: &SchemaContainer, schema: &Schema) -> Self {
        Self::from_paths(schema.allowed_include_paths(container))
    }

    /// Explicit allow-list
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Check a single dotted path
    #[must_use]
    pub fn allows(&self, path: &str) -> bool {
        self.allowed.contains(path)
    }
}

impl QueryRule<IncludePaths> for AllowedIncludePaths {
    fn check(&self, value: &IncludePaths) -> Result<(), ValidationError> {
        let invalid = value
            .iter()
            .map(ToString::to_string)
            .filter(|path| !self.allows(path))
            .collect();
        verdict(Rule::AllowedIncludePaths, invalid)
    }
}

/// `fields[type]` must name sparse-field-eligible fields of a known type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedFieldSets {
    allowed: HashMap<String, HashSet<String>>,
}

impl AllowedFieldSets {
    /// Sparse fields of every registered type
    #[must_use]
    pub fn new(container: &SchemaContainer) -> Self {
        let allowed = container
            .iter()
            .map(|schema| {
                let fields = schema.sparse_fields().into_iter().map(str::to_string).collect();
                (schema.resource_type().to_string(), fields)
            })
            .collect();
        Self { allowed }
    }
}

impl QueryRule<FieldSets> for AllowedFieldSets {
    fn check(&self, value: &FieldSets) -> Result<(), ValidationError> {
        let mut invalid = IndexSet::new();
        for (resource_type, set) in value.iter() {
            match self.allowed.get(resource_type) {
                Some(fields) => {
                    invalid.extend(
                        set.iter()
                            .filter(|field| !fields.contains(*field))
                            .map(|field| format!("{resource_type}.{field}")),
                    );
                }
                None if set.is_empty() => {
                    invalid.insert(resource_type.to_string());
                }
                None => {
                    invalid.extend(set.iter().map(|field| format!("{resource_type}.{field}")));
                }
            }
        }
        verdict(Rule::AllowedFieldSets, invalid)
    }
}

/// `sort` must name sortable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedSortParameters {
    allowed: HashSet<String>,
}

impl AllowedSortParameters {
    /// Sortable fields of `schema`
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self {
            allowed: schema.sortable_fields().into_iter().map(str::to_string).collect(),
        }
    }
}

impl QueryRule<SortFields> for AllowedSortParameters {
    fn check(&self, value: &SortFields) -> Result<(), ValidationError> {
        let invalid = value
            .names()
            .filter(|name| !self.allowed.contains(*name))
            .map(str::to_string)
            .collect();
        verdict(Rule::AllowedSortParameters, invalid)
    }
}

/// `sort` must not name a field twice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistinctSortParameters;

impl QueryRule<SortFields> for DistinctSortParameters {
    fn check(&self, value: &SortFields) -> Result<(), ValidationError> {
        let invalid = value.duplicates().into_iter().map(str::to_string).collect();
        verdict(Rule::DistinctSortParameters, invalid)
    }
}

/// `filter[key]` keys must be declared by the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedFilterParameters {
    allowed: HashSet<String>,
}

impl AllowedFilterParameters {
    /// Filter keys of `schema`
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self {
            allowed: schema.filter_keys().into_iter().map(str::to_string).collect(),
        }
    }
}

impl QueryRule<IndexMap<String, Value>> for AllowedFilterParameters {
    fn check(&self, value: &IndexMap<String, Value>) -> Result<(), ValidationError> {
        let invalid = value.keys().filter(|key| !self.allowed.contains(*key)).cloned().collect();
        verdict(Rule::AllowedFilterParameters, invalid)
    }
}

/// `page[key]` keys must belong to the schema's pagination strategy
///
/// A schema without pagination rejects every page key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedPageParameters {
    allowed: HashSet<String>,
}

impl AllowedPageParameters {
    /// Pagination keys of `schema`
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let allowed = schema
            .pagination()
            .map(|pagination| pagination.keys().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        Self { allowed }
    }
}

impl QueryRule<IndexMap<String, Value>> for AllowedPageParameters {
    fn check(&self, value: &IndexMap<String, Value>) -> Result<(), ValidationError> {
        let invalid = value.keys().filter(|key| !self.allowed.contains(*key)).cloned().collect();
        verdict(Rule::AllowedPageParameters, invalid)
    }
}
