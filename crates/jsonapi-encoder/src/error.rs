//! Error types for document encoding

use jsonapi_document::{ErrorDocument, ErrorObject};
use jsonapi_schema::Cardinality;

/// Resource graph that cannot become a valid document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentStructureError {
    /// Resource node without an id
    #[error("resource of type '{resource_type}' has no id")]
    MissingId { resource_type: String },

    /// Lazy relation data that resolved to another lazy value
    #[error("relationship '{relationship}' resolved to nested lazy data")]
    NestedLazy { relationship: String },

    /// Relation data shape contradicting the declared cardinality
    #[error("relationship '{relationship}' is {expected:?} but data has the other shape")]
    CardinalityMismatch {
        relationship: String,
        expected: Cardinality,
    },
}

/// Errors produced while encoding a document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Malformed resource graph
    #[error("invalid document structure: {0}")]
    DocumentStructure(#[from] DocumentStructureError),
}

impl EncodeError {
    /// HTTP status for responses caused by this error
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        500
    }

    /// Client-facing error object
    ///
    /// Carries no internal detail; log the error itself for diagnosis.
    #[must_use]
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject::new()
            .with_status(self.status())
            .with_title("Internal Server Error")
    }

    /// Client-facing error document
    #[must_use]
    pub fn to_error_document(&self) -> ErrorDocument {
        ErrorDocument::new(vec![self.to_error_object()])
    }
}

/// Result type alias for encoding
pub type EncodeResult<T> = Result<T, EncodeError>;
