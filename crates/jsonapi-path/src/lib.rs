//! JSON:API Query Values
//!
//! Immutable, parseable value objects for the JSON:API query parameters that
//! drive compound documents.
//!
//! # Core Concepts
//!
//! - [`RelationshipPath`]: Dot-separated relationship chain (`author.posts`)
//! - [`IncludePaths`]: The `include` parameter, a set of relationship paths
//! - [`FieldSets`]: The `fields[type]` parameters, sparse fieldsets per type
//! - [`SortFields`]: The `sort` parameter, ordered `+`/`-` prefixed fields
//!
//! # Example
//!
//! ```rust
//! use jsonapi_path::{FieldSets, IncludePaths, SortFields};
//!
//! let include: IncludePaths = "author,comments.author".parse().unwrap();
//! assert_eq!(include.max_depth(), 2);
//!
//! let fields = FieldSets::from_pairs([("posts", "title,author")]);
//! assert!(fields.allows("posts", "title"));
//! assert!(fields.allows("users", "name"));
//!
//! let sort: SortFields = "-createdAt,title".parse().unwrap();
//! assert!(sort.iter().next().unwrap().is_descending());
//! ```

#![warn(unreachable_pub)]

mod error;
mod field_sets;
mod include_paths;
mod relationship_path;
mod sort;

// Re-exports
pub use error::{PathError, SortError};
pub use field_sets::{FieldSet, FieldSets};
pub use include_paths::IncludePaths;
pub use relationship_path::RelationshipPath;
pub use sort::{SortField, SortFields};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
