//! Typed JSON:API query parameters

use crate::error::{ParseError, QueryError, QueryErrors};
use crate::raw::decode_query_string;
use indexmap::IndexMap;
use jsonapi_path::{FieldSet, FieldSets, IncludePaths, SortFields};
use jsonapi_schema::Schema;
use serde_json::{Map, Value};

/// Recognised query parameters of one request
///
/// `None` means the parameter was absent; an explicitly empty value
/// (`include=`) is `Some` of an empty collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    /// `include`
    pub include: Option<IncludePaths>,

    /// `fields[type]`
    pub fields: Option<FieldSets>,

    /// `sort`
    pub sort: Option<SortFields>,

    /// `filter[key]`
    pub filter: Option<IndexMap<String, Value>>,

    /// `page[key]`
    pub page: Option<IndexMap<String, Value>>,
}

impl QueryParameters {
    /// Decode and parse a raw query string
    ///
    /// # Errors
    /// Returns every parse error found
    pub fn from_query_string(raw: &str) -> Result<Self, QueryErrors> {
        let value = decode_query_string(raw).map_err(|err| QueryErrors::from(QueryError::from(err)))?;
        Self::from_value(&value)
    }

    /// Parse already-decoded parameters
    ///
    /// # Errors
    /// Returns every parse error found
    pub fn from_value(value: &Value) -> Result<Self, QueryErrors> {
        let (parameters, errors) = Self::parse_partial(value);
        let mut all = QueryErrors::new();
        for err in errors {
            all.push(err);
        }
        all.into_result(parameters)
    }

    /// Parse each parameter independently
    ///
    /// A parameter that fails to parse is left `None` and its error is
    /// returned alongside the parameters that did parse.
    #[must_use]
    pub fn parse_partial(value: &Value) -> (Self, Vec<ParseError>) {
        let mut parameters = Self::default();
        let mut errors = Vec::new();

        let Some(map) = value.as_object() else {
            errors.push(ParseError::NotAMap {
                parameter: "query".to_string(),
            });
            return (parameters, errors);
        };

        if let Some(raw) = map.get("include") {
            match parse_include(raw) {
                Ok(include) => parameters.include = Some(include),
                Err(err) => errors.push(err),
            }
        }

        if let Some(raw) = map.get("fields") {
            match parse_fields(raw) {
                Ok(fields) => parameters.fields = Some(fields),
                Err(err) => errors.push(err),
            }
        }

        if let Some(raw) = map.get("sort") {
            match parse_sort(raw) {
                Ok(sort) => parameters.sort = Some(sort),
                Err(err) => errors.push(err),
            }
        }

        if let Some(raw) = map.get("filter") {
            match parse_map("filter", raw) {
                Ok(filter) => parameters.filter = Some(filter),
                Err(err) => errors.push(err),
            }
        }

        if let Some(raw) = map.get("page") {
            match parse_map("page", raw) {
                Ok(page) => parameters.page = Some(page),
                Err(err) => errors.push(err),
            }
        }

        (parameters, errors)
    }

    /// Requested include paths, or the schema default when absent
    #[must_use]
    pub fn include_paths_or_default(&self, schema: &Schema) -> IncludePaths {
        self.include
            .clone()
            .unwrap_or_else(|| schema.default_include_paths().clone())
    }

    /// Requested sort, or the schema default when absent
    #[must_use]
    pub fn sort_or_default(&self, schema: &Schema) -> SortFields {
        self.sort.clone().unwrap_or_else(|| schema.default_sort().clone())
    }

    /// Requested sparse fieldsets (unrestricted when absent)
    #[must_use]
    pub fn field_sets(&self) -> FieldSets {
        self.fields.clone().unwrap_or_default()
    }
}

fn parse_include(raw: &Value) -> Result<IncludePaths, ParseError> {
    match raw {
        Value::String(s) => Ok(s.parse()?),
        Value::Array(items) => {
            let paths = strings("include", items)?;
            Ok(IncludePaths::from_strings(paths)?)
        }
        _ => Err(ParseError::NotAString {
            parameter: "include".to_string(),
        }),
    }
}

fn parse_fields(raw: &Value) -> Result<FieldSets, ParseError> {
    let Value::Object(map) = raw else {
        return Err(ParseError::NotAMap {
            parameter: "fields".to_string(),
        });
    };

    let mut sets = FieldSets::new();
    for (resource_type, fields) in map {
        let set = match fields {
            Value::String(s) => FieldSet::parse(s),
            Value::Array(items) => {
                let names = items
                    .iter()
                    .map(Value::as_str)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid_field_set(resource_type))?;
                FieldSet::new(names)
            }
            _ => return Err(invalid_field_set(resource_type)),
        };
        sets.insert(resource_type.as_str(), set);
    }
    Ok(sets)
}

fn invalid_field_set(resource_type: &str) -> ParseError {
    ParseError::InvalidFieldSet {
        resource_type: resource_type.to_string(),
    }
}

fn parse_sort(raw: &Value) -> Result<SortFields, ParseError> {
    match raw {
        Value::String(s) => Ok(s.parse()?),
        _ => Err(ParseError::NotAString {
            parameter: "sort".to_string(),
        }),
    }
}

fn parse_map(parameter: &str, raw: &Value) -> Result<IndexMap<String, Value>, ParseError> {
    match raw {
        Value::Object(map) => Ok(to_index_map(map)),
        _ => Err(ParseError::NotAMap {
            parameter: parameter.to_string(),
        }),
    }
}

fn to_index_map(map: &Map<String, Value>) -> IndexMap<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn strings<'v>(parameter: &str, items: &'v [Value]) -> Result<Vec<&'v str>, ParseError> {
    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| ParseError::NotAString {
                parameter: parameter.to_string(),
            })
        })
        .collect()
}
