//! JSON:API Resource Schemas
//!
//! Static descriptions of resource types and the relationships between them.
//!
//! # Core Concepts
//!
//! - [`Schema`]: Fields, filters, pagination and include depth of one type
//! - [`SchemaContainer`]: Read-only registry, validated as a whole on build
//! - [`IncludePathExpander`]: Every include path of a type up to a depth
//! - [`RegistryDefinition`]: Serde form of a registry, for config files
//!
//! # Example
//!
//! ```rust
//! use jsonapi_schema::{Attribute, Relationship, Schema, SchemaContainer};
//!
//! let container = SchemaContainer::builder()
//!     .register(
//!         Schema::builder("posts")
//!             .attribute(Attribute::new("title"))
//!             .relationship(Relationship::to_one("author", "users"))
//!             .max_depth(2)
//!             .build()
//!             .unwrap(),
//!     )
//!     .register(
//!         Schema::builder("users")
//!             .relationship(Relationship::to_many("posts", "posts"))
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let posts = container.schema_for("posts").unwrap();
//! let paths: Vec<String> = posts.allowed_include_paths(&container).iter().collect();
//! assert_eq!(paths, vec!["author", "author.posts"]);
//! ```

#![warn(unreachable_pub)]

mod container;
mod definition;
mod error;
mod expander;
mod field;
mod schema;

// Re-exports
pub use container::{SchemaContainer, SchemaContainerBuilder};
pub use definition::{AttributeDefinition, RegistryDefinition, RelationshipDefinition, SchemaDefinition};
pub use error::{SchemaError, SchemaResult};
pub use expander::{IncludePathExpander, IncludePathIter};
pub use field::{Attribute, Cardinality, Field, Filter, Pagination, Relationship};
pub use schema::{Schema, SchemaBuilder, DEFAULT_MAX_DEPTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
