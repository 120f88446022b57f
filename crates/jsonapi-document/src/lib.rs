//! JSON:API Document Model
//!
//! Serializable wire-format types for JSON:API responses. These carry no
//! encoding logic; `jsonapi-encoder` builds them from resource graphs.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_document::{CompoundDocument, JsonApiObject, PrimaryData, ResourceObject};
//! use serde_json::json;
//!
//! let mut post = ResourceObject::new("posts", "1");
//! post.attributes.insert("title".into(), json!("Hello"));
//!
//! let mut doc = CompoundDocument::new(PrimaryData::Resource(post));
//! doc.jsonapi = Some(JsonApiObject::new("1.0"));
//!
//! assert_eq!(
//!     doc.to_value().unwrap(),
//!     json!({
//!         "jsonapi": {"version": "1.0"},
//!         "data": {"type": "posts", "id": "1", "attributes": {"title": "Hello"}}
//!     })
//! );
//! ```

#![warn(unreachable_pub)]

mod document;
mod error_object;
mod identifier;
mod links;
mod resource;

// Re-exports
pub use document::{CompoundDocument, JsonApiObject, PrimaryData};
pub use error_object::{ErrorDocument, ErrorObject, ErrorSource};
pub use identifier::ResourceIdentifier;
pub use links::{Link, Links, Meta};
pub use resource::{RelationshipData, RelationshipObject, ResourceObject};

/// JSON:API version emitted by default
pub const JSONAPI_VERSION: &str = "1.0";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
