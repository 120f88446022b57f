//! JSON:API Query Parameters
//!
//! Decodes `include`, `fields[type]`, `sort`, `filter[key]` and `page[key]`
//! and checks them against the schema registry before any data is loaded.
//!
//! # Core Concepts
//!
//! - [`QueryParameters`]: Typed parameters; absent and explicitly empty differ
//! - [`QueryRule`]: One allow-list check, reporting every invalid member
//! - [`QueryValidator`]: All rules for one primary type
//! - [`QueryErrors`]: Accumulated errors, rendered as a 400 error document
//!
//! # Example
//!
//! ```rust
//! use jsonapi_query::QueryValidator;
//! use jsonapi_schema::{Attribute, Relationship, Schema, SchemaContainer};
//!
//! let container = SchemaContainer::builder()
//!     .register(
//!         Schema::builder("posts")
//!             .attribute(Attribute::new("title").sortable())
//!             .relationship(Relationship::to_one("author", "users"))
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
//! let validator = QueryValidator::new(&container, "posts").unwrap();
//! assert!(validator.parse_query_string("include=author&sort=-title").is_ok());
//!
//! let errors = validator.parse_query_string("include=author.posts").unwrap_err();
//! let doc = errors.to_error_document();
//! assert_eq!(doc.http_status(), 400);
//! assert_eq!(
//!     doc.errors[0].detail.as_deref(),
//!     Some("Include path author.posts is not allowed.")
//! );
//! ```

#![warn(unreachable_pub)]

mod error;
mod parameters;
mod raw;
mod rules;
mod validator;

// Re-exports
pub use error::{ParseError, QueryError, QueryErrors, Rule, ValidationError};
pub use parameters::QueryParameters;
pub use raw::decode_query_string;
pub use rules::{
    AllowedFieldSets, AllowedFilterParameters, AllowedIncludePaths, AllowedPageParameters, AllowedSortParameters,
    DistinctSortParameters, QueryRule,
};
pub use validator::QueryValidator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
