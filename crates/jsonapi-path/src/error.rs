//! Errors for path and field value parsing

/// Errors related to relationship paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path without any segment
    #[error("relationship path is empty")]
    EmptyPath,

    /// Empty segment in path
    #[error("relationship path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// Invalid segment characters
    #[error("invalid relationship name: '{0}'")]
    InvalidSegment(String),
}

/// Errors related to sort parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// Sort token with a direction prefix but no field name
    #[error("sort field '{0}' has no name")]
    MissingName(String),

    /// Sort field name with whitespace or separators
    #[error("invalid sort field: '{0}'")]
    InvalidName(String),
}
