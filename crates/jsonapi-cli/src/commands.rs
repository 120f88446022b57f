//! Subcommand implementations

use crate::config::CliConfig;
use anyhow::{bail, Result};
use jsonapi_query::QueryValidator;
use jsonapi_schema::SchemaContainer;
use serde_json::{json, Value};
use tracing::warn;

/// Deepest `paths --depth` accepted; enumeration grows exponentially on
/// cyclic schemas
pub(crate) const MAX_LISTED_DEPTH: usize = 8;

/// Result of `check`
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CheckOutcome {
    /// Effective parameters, schema defaults applied
    Valid(Value),

    /// Error document to send back (HTTP 400)
    Invalid(Value),
}

pub(crate) fn list_types(container: &SchemaContainer) -> Vec<String> {
    container
        .iter()
        .map(|schema| {
            format!(
                "{} (fields: {}, max depth: {})",
                schema.resource_type(),
                schema.fields().count(),
                schema.max_depth()
            )
        })
        .collect()
}

pub(crate) fn list_paths(container: &SchemaContainer, resource_type: &str, depth: Option<usize>) -> Result<Vec<String>> {
    let schema = container.schema_for(resource_type)?;
    let expander = match depth {
        Some(depth) if depth > MAX_LISTED_DEPTH => {
            bail!("depth {depth} exceeds the listing limit of {MAX_LISTED_DEPTH}")
        }
        Some(depth) => {
            if depth > schema.max_depth() {
                warn!(
                    resource_type,
                    depth,
                    max_depth = schema.max_depth(),
                    "Listing paths deeper than the schema allows in queries"
                );
            }
            schema.include_paths(container, depth)?
        }
        None => schema.allowed_include_paths(container),
    };
    Ok(expander.iter().collect())
}

pub(crate) fn check_query(
    config: &CliConfig,
    container: &SchemaContainer,
    resource_type: &str,
    query: &str,
) -> Result<CheckOutcome> {
    let schema = container.schema_for(resource_type)?;
    let validator = QueryValidator::new(container, resource_type)?;

    match validator.parse_query_string(query) {
        Ok(parameters) => Ok(CheckOutcome::Valid(json!({
            "type": resource_type,
            "include": parameters.include_paths_or_default(schema).to_string(),
            "fields": parameters.field_sets(),
            "sort": parameters.sort_or_default(schema).to_string(),
            "filter": parameters.filter.unwrap_or_default(),
            "page": parameters.page.unwrap_or_default(),
        }))),
        Err(errors) => {
            let mut document = errors.to_error_document();
            if let Some(jsonapi) = config.encoder.jsonapi_object() {
                document = document.with_jsonapi(jsonapi);
            }
            Ok(CheckOutcome::Invalid(document.to_value()?))
        }
    }
}
