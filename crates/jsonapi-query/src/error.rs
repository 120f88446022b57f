//! Error types for query parameter parsing and validation

use jsonapi_document::{ErrorDocument, ErrorObject, ErrorSource};
use jsonapi_path::{PathError, SortError};
use std::fmt;

/// Malformed query parameter syntax
///
/// Stops processing of the offending parameter only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Expected a string (or list of strings)
    #[error("query parameter '{parameter}' must be a string")]
    NotAString { parameter: String },

    /// Expected a `name[key]=value` map
    #[error("query parameter '{parameter}' must be a map")]
    NotAMap { parameter: String },

    /// `fields[type]` that is neither a string nor a list of strings
    #[error("query parameter 'fields[{resource_type}]' must be a comma-separated string")]
    InvalidFieldSet { resource_type: String },

    /// Bad include path syntax
    #[error("invalid include parameter: {0}")]
    InvalidInclude(#[from] PathError),

    /// Bad sort syntax
    #[error("invalid sort parameter: {0}")]
    InvalidSort(#[from] SortError),

    /// Query string mixing `name=..` and `name[..]=..`
    #[error("query parameter '{parameter}' is given both as a value and as a map")]
    Conflict { parameter: String },
}

impl ParseError {
    /// Query parameter the error refers to
    #[must_use]
    pub fn parameter(&self) -> String {
        match self {
            Self::NotAString { parameter } | Self::NotAMap { parameter } | Self::Conflict { parameter } => {
                parameter.clone()
            }
            Self::InvalidFieldSet { resource_type } => format!("fields[{resource_type}]"),
            Self::InvalidInclude(_) => "include".to_string(),
            Self::InvalidSort(_) => "sort".to_string(),
        }
    }
}

/// Allow-list rule that produced a [`ValidationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `include` members outside the expanded include paths
    AllowedIncludePaths,

    /// `fields[type]` members that are not sparse fields of the type
    AllowedFieldSets,

    /// `sort` members that are not sortable
    AllowedSortParameters,

    /// `sort` members named more than once
    DistinctSortParameters,

    /// `filter[key]` keys the schema does not declare
    AllowedFilterParameters,

    /// `page[key]` keys the pagination strategy does not use
    AllowedPageParameters,
}

impl Rule {
    /// Message key prefix
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::AllowedIncludePaths => "allowed_include_paths",
            Self::AllowedFieldSets => "allowed_field_sets",
            Self::AllowedSortParameters => "allowed_sort_parameters",
            Self::DistinctSortParameters => "distinct_sort_parameters",
            Self::AllowedFilterParameters => "allowed_filter_parameters",
            Self::AllowedPageParameters => "allowed_page_parameters",
        }
    }

    /// Query parameter the rule checks
    #[must_use]
    pub fn parameter(self) -> &'static str {
        match self {
            Self::AllowedIncludePaths => "include",
            Self::AllowedFieldSets => "fields",
            Self::AllowedSortParameters | Self::DistinctSortParameters => "sort",
            Self::AllowedFilterParameters => "filter",
            Self::AllowedPageParameters => "page",
        }
    }

    fn noun(self, plural: bool) -> &'static str {
        match (self, plural) {
            (Self::AllowedIncludePaths, false) => "Include path",
            (Self::AllowedIncludePaths, true) => "Include paths",
            (Self::AllowedFieldSets, false) => "Sparse field set",
            (Self::AllowedFieldSets, true) => "Sparse field sets",
            (Self::AllowedSortParameters | Self::DistinctSortParameters, false) => "Sort parameter",
            (Self::AllowedSortParameters | Self::DistinctSortParameters, true) => "Sort parameters",
            (Self::AllowedFilterParameters, false) => "Filter parameter",
            (Self::AllowedFilterParameters, true) => "Filter parameters",
            (Self::AllowedPageParameters, false) => "Page parameter",
            (Self::AllowedPageParameters, true) => "Page parameters",
        }
    }

    fn complaint(self) -> &'static str {
        match self {
            Self::DistinctSortParameters => "duplicated",
            _ => "not allowed",
        }
    }
}

/// Every invalid member of one query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    rule: Rule,
    invalid: Vec<String>,
}

impl ValidationError {
    /// Error listing `invalid` members
    #[must_use]
    pub fn new(rule: Rule, invalid: Vec<String>) -> Self {
        Self { rule, invalid }
    }

    /// Rule that failed
    #[inline]
    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Offending query parameter
    #[inline]
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        self.rule.parameter()
    }

    /// Invalid members in the order they were found
    #[inline]
    #[must_use]
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// Check if more than one member is reported
    #[inline]
    #[must_use]
    pub fn is_plural(&self) -> bool {
        self.invalid.len() > 1
    }

    /// Translation key (`allowed_include_paths.singular`)
    #[must_use]
    pub fn message_key(&self) -> String {
        let form = if self.is_plural() { "plural" } else { "singular" };
        format!("{}.{form}", self.rule.key())
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> String {
        let plural = self.is_plural();
        let verb = if plural { "are" } else { "is" };
        format!(
            "{} {} {verb} {}.",
            self.rule.noun(plural),
            self.invalid.join(", "),
            self.rule.complaint()
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Any query parameter problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Syntax error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Allow-list violation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl QueryError {
    /// Offending query parameter
    #[must_use]
    pub fn parameter(&self) -> String {
        match self {
            Self::Parse(err) => err.parameter(),
            Self::Invalid(err) => err.parameter().to_string(),
        }
    }

    /// JSON:API error object (status 400)
    #[must_use]
    pub fn to_error_object(&self) -> ErrorObject {
        let code = match self {
            Self::Parse(_) => "invalid_query_parameter".to_string(),
            Self::Invalid(err) => err.message_key(),
        };
        ErrorObject::new()
            .with_status(400)
            .with_code(code)
            .with_title("Invalid Query Parameter")
            .with_detail(self.to_string())
            .with_source(ErrorSource::parameter(self.parameter()))
    }
}

/// Errors accumulated across independent query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid query parameter(s)", .0.len())]
pub struct QueryErrors(Vec<QueryError>);

impl QueryErrors {
    /// No errors
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn push(&mut self, error: impl Into<QueryError>) {
        self.0.push(error.into());
    }

    /// Iterate in the order errors were recorded
    pub fn iter(&self) -> impl Iterator<Item = &QueryError> {
        self.0.iter()
    }

    /// Number of errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing went wrong
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    /// Returns `self` if any error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// JSON:API error document with one error object per error
    #[must_use]
    pub fn to_error_document(&self) -> ErrorDocument {
        ErrorDocument::new(self.0.iter().map(QueryError::to_error_object).collect())
    }
}

impl From<QueryError> for QueryErrors {
    fn from(error: QueryError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for QueryErrors {
    type Item = QueryError;
    type IntoIter = std::vec::IntoIter<QueryError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryErrors {
    type Item = &'a QueryError;
    type IntoIter = std::slice::Iter<'a, QueryError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
