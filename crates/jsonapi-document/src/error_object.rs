//! Error objects and error documents

use crate::document::JsonApiObject;
use crate::links::{Link, Links, Meta};
use serde::Serialize;

/// Where in the request an error originated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSource {
    /// JSON Pointer into the request document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,

    /// Query parameter that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    /// Request header that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl ErrorSource {
    /// Source pointing at a query parameter
    #[must_use]
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            parameter: Some(name.into()),
            ..Self::default()
        }
    }

    /// Source pointing into the request document
    #[must_use]
    pub fn pointer(pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..Self::default()
        }
    }
}

/// JSON:API error object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorObject {
    /// Unique identifier for this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Error links (`about`)
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// HTTP status code, as a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Application-specific error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Short summary, identical for every occurrence of the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request location of the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,

    /// Error meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl ErrorObject {
    /// Empty error object
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status.to_string());
        self
    }

    /// Set the application error code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the source
    #[must_use]
    pub fn with_source(mut self, source: ErrorSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the `about` link
    #[must_use]
    pub fn with_about(mut self, href: impl Into<String>) -> Self {
        self.links.insert("about", Link::new(href));
        self
    }

    /// Set the error meta
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Status as a number, if set and numeric
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Top-level document carrying `errors` instead of `data`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorDocument {
    /// Version information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,

    /// Errors, in the order they were found
    pub errors: Vec<ErrorObject>,

    /// Top-level links
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Top-level meta
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl ErrorDocument {
    /// Document with the given errors
    #[must_use]
    pub fn new(errors: Vec<ErrorObject>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Attach version information
    #[must_use]
    pub fn with_jsonapi(mut self, jsonapi: JsonApiObject) -> Self {
        self.jsonapi = Some(jsonapi);
        self
    }

    /// Most generally applicable HTTP status for the response
    ///
    /// A shared status wins; otherwise any 5xx yields 500, any 4xx yields
    /// 400, and a document without statuses yields 500.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        let statuses: Vec<u16> = self.errors.iter().filter_map(ErrorObject::status_code).collect();

        match statuses.first() {
            None => 500,
            Some(&first) if statuses.iter().all(|&s| s == first) => first,
            Some(_) if statuses.iter().any(|&s| s >= 500) => 500,
            Some(_) => 400,
        }
    }

    /// Serialize to a JSON value
    ///
    /// # Errors
    /// Returns error if a meta value cannot be represented as JSON
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn error_object_serialization() {
        let error = ErrorObject::new()
            .with_status(400)
            .with_title("Invalid Query Parameter")
            .with_detail("Include path foo is not allowed.")
            .with_source(ErrorSource::parameter("include"));

        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "status": "400",
                "title": "Invalid Query Parameter",
                "detail": "Include path foo is not allowed.",
                "source": {"parameter": "include"}
            })
        );
    }

    #[test]
    fn error_document_status_shared() {
        let doc = ErrorDocument::new(vec![
            ErrorObject::new().with_status(400),
            ErrorObject::new().with_status(400),
        ]);
        assert_eq!(doc.http_status(), 400);
    }

    #[test]
    fn error_document_status_mixed() {
        let client = ErrorDocument::new(vec![
            ErrorObject::new().with_status(400),
            ErrorObject::new().with_status(422),
        ]);
        assert_eq!(client.http_status(), 400);

        let server = ErrorDocument::new(vec![
            ErrorObject::new().with_status(400),
            ErrorObject::new().with_status(503),
        ]);
        assert_eq!(server.http_status(), 500);

        assert_eq!(ErrorDocument::new(vec![]).http_status(), 500);
    }

    #[test]
    fn error_document_serialization() {
        let doc = ErrorDocument::new(vec![ErrorObject::new().with_status(500)])
            .with_jsonapi(JsonApiObject::new("1.0"));
        assert_eq!(
            doc.to_value().unwrap(),
            json!({"jsonapi": {"version": "1.0"}, "errors": [{"status": "500"}]})
        );
    }
}
