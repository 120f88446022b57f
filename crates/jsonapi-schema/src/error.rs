//! Error types for schema construction and lookup

/// Errors building or querying the schema registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Include-path depth below one
    #[error("include path depth must be at least 1, got {0}")]
    InvalidDepth(usize),

    /// No schema registered for a resource type
    #[error("no schema registered for resource type '{0}'")]
    UnknownType(String),

    /// Two schemas registered for the same type
    #[error("resource type '{0}' is registered more than once")]
    DuplicateType(String),

    /// Two fields of a schema share a name
    #[error("field '{field}' is declared more than once on '{resource_type}'")]
    DuplicateField {
        resource_type: String,
        field: String,
    },

    /// Field named `type` or `id`
    #[error("field name '{field}' is reserved on '{resource_type}'")]
    ReservedField {
        resource_type: String,
        field: String,
    },

    /// Relationship pointing at an unregistered type
    #[error("relationship '{resource_type}.{relationship}' refers to unknown type '{inverse}'")]
    UnknownInverse {
        resource_type: String,
        relationship: String,
        inverse: String,
    },

    /// Default include path outside the schema's allowed paths
    #[error("default include path '{path}' is not a valid include path for '{resource_type}'")]
    InvalidDefaultInclude {
        resource_type: String,
        path: String,
    },

    /// Default sort on a field that is not sortable
    #[error("default sort field '{field}' is not sortable on '{resource_type}'")]
    InvalidDefaultSort {
        resource_type: String,
        field: String,
    },
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
