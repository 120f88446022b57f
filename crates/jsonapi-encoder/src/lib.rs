//! JSON:API Compound Document Encoder
//!
//! Turns a graph of [`JsonApiResource`] nodes into a [`CompoundDocument`],
//! honouring the request's include paths and sparse fieldsets.
//!
//! # Core Concepts
//!
//! - [`JsonApiResource`]: Wraps a domain record as a graph node
//! - [`AttrValue`] / [`Attributes`]: Plain, lazy and conditional attributes
//! - [`Relation`] / [`RelationData`]: Relationship linkage and related nodes
//! - [`SchemaFields`]: Per-request lookup index consulted during the walk
//! - [`Encoder`] / [`DocumentBuilder`]: Shared settings, per-request options
//!
//! # Example
//!
//! ```rust
//! use jsonapi_encoder::{Attributes, Encoder, EncoderConfig, JsonApiResource};
//! use serde_json::json;
//!
//! struct Tag {
//!     id: u32,
//!     label: String,
//! }
//!
//! impl JsonApiResource for Tag {
//!     fn resource_type(&self) -> &str {
//!         "tags"
//!     }
//!
//!     fn id(&self) -> Option<String> {
//!         Some(self.id.to_string())
//!     }
//!
//!     fn attributes(&self) -> Attributes<'_> {
//!         Attributes::new().value("label", self.label.as_str())
//!     }
//! }
//!
//! let encoder = Encoder::new(EncoderConfig::new().with_base_uri("https://api.test"));
//! let tag = Tag { id: 7, label: "rust".into() };
//! let doc = encoder.document().resource(&tag).unwrap();
//!
//! assert_eq!(
//!     doc.to_value().unwrap(),
//!     json!({
//!         "jsonapi": {"version": "1.0"},
//!         "data": {
//!             "type": "tags",
//!             "id": "7",
//!             "attributes": {"label": "rust"},
//!             "links": {"self": "https://api.test/tags/7"}
//!         }
//!     })
//! );
//! ```

#![warn(unreachable_pub)]

mod config;
mod encoder;
mod error;
mod resource;
mod schema_fields;

// Re-exports
pub use config::EncoderConfig;
pub use encoder::{Data, DocumentBuilder, Encoder};
pub use error::{DocumentStructureError, EncodeError, EncodeResult};
pub use resource::{AttrValue, Attributes, Condition, JsonApiResource, Relation, RelationData};
pub use schema_fields::SchemaFields;

pub use jsonapi_document::CompoundDocument;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
