//! Per-type query validation

use crate::error::{QueryError, QueryErrors, ValidationError};
use crate::parameters::QueryParameters;
use crate::raw::decode_query_string;
use crate::rules::{
    AllowedFieldSets, AllowedFilterParameters, AllowedIncludePaths, AllowedPageParameters, AllowedSortParameters,
    DistinctSortParameters, QueryRule,
};
use jsonapi_schema::{SchemaContainer, SchemaResult};
use serde_json::Value;
use tracing::debug;

/// Validates query parameters for requests whose primary type is fixed
///
/// Build once per resource type at bootstrap; validation only reads.
#[derive(Debug, Clone)]
pub struct QueryValidator {
    resource_type: String,
    include: AllowedIncludePaths,
    fields: AllowedFieldSets,
    sort: AllowedSortParameters,
    distinct_sort: Option<DistinctSortParameters>,
    filter: AllowedFilterParameters,
    page: AllowedPageParameters,
}

impl QueryValidator {
    /// Validator for requests on `resource_type`
    ///
    /// # Errors
    /// Returns [`jsonapi_schema::SchemaError::UnknownType`] if the type is not registered
    pub fn new(container: &SchemaContainer, resource_type: &str) -> SchemaResult<Self> {
        let schema = container.schema_for(resource_type)?;
        Ok(Self {
            resource_type: resource_type.to_string(),
            include: AllowedIncludePaths::new(container, schema),
            fields: AllowedFieldSets::new(container),
            sort: AllowedSortParameters::new(schema),
            distinct_sort: Some(DistinctSortParameters),
            filter: AllowedFilterParameters::new(schema),
            page: AllowedPageParameters::new(schema),
        })
    }

    /// Accept `sort` naming the same field more than once
    #[must_use]
    pub fn allow_duplicate_sort(mut self) -> Self {
        self.distinct_sort = None;
        self
    }

    /// Primary resource type
    #[inline]
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Run every rule over the parameters that are present
    ///
    /// # Errors
    /// Returns one error per failing rule
    pub fn validate(&self, parameters: &QueryParameters) -> Result<(), QueryErrors> {
        let mut errors = QueryErrors::new();
        self.collect(parameters, &mut errors);
        errors.into_result(())
    }

    /// Parse and validate decoded parameters
    ///
    /// Parse errors and rule violations of independent parameters are
    /// reported together.
    ///
    /// # Errors
    /// Returns every parse error and rule violation found
    pub fn parse_value(&self, value: &Value) -> Result<QueryParameters, QueryErrors> {
        let (parameters, parse_errors) = QueryParameters::parse_partial(value);
        let mut errors = QueryErrors::new();
        for err in parse_errors {
            errors.push(err);
        }
        self.collect(&parameters, &mut errors);

        if !errors.is_empty() {
            debug!(
                resource_type = %self.resource_type,
                errors = errors.len(),
                "Query rejected"
            );
        }
        errors.into_result(parameters)
    }

    /// Decode, parse and validate a raw query string
    ///
    /// # Errors
    /// Returns every parse error and rule violation found
    pub fn parse_query_string(&self, raw: &str) -> Result<QueryParameters, QueryErrors> {
        let value = decode_query_string(raw).map_err(|err| QueryErrors::from(QueryError::from(err)))?;
        self.parse_value(&value)
    }

    fn collect(&self, parameters: &QueryParameters, errors: &mut QueryErrors) {
        if let Some(include) = &parameters.include {
            record(errors, self.include.check(include));
        }

        if let Some(fields) = &parameters.fields {
            record(errors, self.fields.check(fields));
        }

        if let Some(sort) = &parameters.sort {
            record(errors, self.sort.check(sort));
            if let Some(distinct) = &self.distinct_sort {
                record(errors, distinct.check(sort));
            }
        }

        if let Some(filter) = &parameters.filter {
            record(errors, self.filter.check(filter));
        }

        if let Some(page) = &parameters.page {
            record(errors, self.page.check(page));
        }
    }
}

fn record(errors: &mut QueryErrors, outcome: Result<(), ValidationError>) {
    if let Err(err) = outcome {
        errors.push(err);
    }
}
