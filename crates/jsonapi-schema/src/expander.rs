//! Depth-bounded include-path enumeration
//!
//! Schemas may reference each other cyclically (`posts.author.posts`), so
//! expansion is bounded by depth alone. Paths are produced lazily in
//! pre-order: a relationship is yielded before any path through it.

use crate::container::SchemaContainer;
use crate::error::{SchemaError, SchemaResult};
use crate::field::{Field, Relationship};
use crate::schema::Schema;
use indexmap::map::Values;
use tracing::warn;

/// Enumerates every include path of a schema up to a depth
///
/// Iterating twice walks the schemas twice; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct IncludePathExpander<'a> {
    container: &'a SchemaContainer,
    schema: &'a Schema,
    depth: usize,
}

impl<'a> IncludePathExpander<'a> {
    /// Create expander for `schema`, resolving inverses through `container`
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidDepth`] when `depth` is zero
    pub fn new(container: &'a SchemaContainer, schema: &'a Schema, depth: usize) -> SchemaResult<Self> {
        if depth < 1 {
            return Err(SchemaError::InvalidDepth(depth));
        }
        Ok(Self::at_depth(container, schema, depth))
    }

    pub(crate) fn at_depth(container: &'a SchemaContainer, schema: &'a Schema, depth: usize) -> Self {
        Self {
            container,
            schema,
            depth,
        }
    }

    /// Maximum number of segments in a yielded path
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Start a fresh walk
    #[must_use]
    pub fn iter(&self) -> IncludePathIter<'a> {
        IncludePathIter {
            container: self.container,
            stack: vec![Frame {
                fields: self.schema.fields_raw(),
                prefix: String::new(),
                depth: self.depth,
            }],
        }
    }
}

impl<'a> IntoIterator for &IncludePathExpander<'a> {
    type Item = String;
    type IntoIter = IncludePathIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for IncludePathExpander<'a> {
    type Item = String;
    type IntoIter = IncludePathIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Frame<'a> {
    fields: Values<'a, String, Field>,
    prefix: String,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn next_include_path(&mut self) -> Option<&'a Relationship> {
        self.fields
            .by_ref()
            .filter_map(Field::as_relationship)
            .find(|rel| rel.is_include_path())
    }
}

/// Lazy pre-order walk over include paths
pub struct IncludePathIter<'a> {
    container: &'a SchemaContainer,
    stack: Vec<Frame<'a>>,
}

impl std::fmt::Debug for IncludePathIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncludePathIter").field("pending_frames", &self.stack.len()).finish()
    }
}

impl Iterator for IncludePathIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(rel) = frame.next_include_path() else {
                self.stack.pop();
                continue;
            };

            let depth = frame.depth;
            let path = if frame.prefix.is_empty() {
                rel.name().to_string()
            } else {
                format!("{}.{}", frame.prefix, rel.name())
            };

            if depth > 1 {
                match self.container.get(rel.inverse()) {
                    Some(inverse) => self.stack.push(Frame {
                        fields: inverse.fields_raw(),
                        prefix: path.clone(),
                        depth: depth - 1,
                    }),
                    None => warn!(
                        path = %path,
                        inverse = rel.inverse(),
                        "Inverse schema missing, include path not expanded"
                    ),
                }
            }

            return Some(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Attribute, Relationship};

    fn blog() -> SchemaContainer {
        SchemaContainer::builder()
            .register(
                Schema::builder("posts")
                    .attribute(Attribute::new("title"))
                    .relationship(Relationship::to_one("author", "users"))
                    .relationship(Relationship::to_many("tags", "tags"))
                    .build()
                    .unwrap(),
            )
            .register(
                Schema::builder("users")
                    .attribute(Attribute::new("name"))
                    .relationship(Relationship::to_many("posts", "posts"))
                    .relationship(Relationship::to_one("secret", "users").not_include_path())
                    .build()
                    .unwrap(),
            )
            .register(Schema::builder("tags").attribute(Attribute::new("label")).build().unwrap())
            .build()
            .unwrap()
    }

    fn expand(container: &SchemaContainer, ty: &str, depth: usize) -> Vec<String> {
        let schema = container.schema_for(ty).unwrap();
        IncludePathExpander::new(container, schema, depth).unwrap().iter().collect()
    }

    #[test]
    fn depth_one() {
        let container = blog();
        assert_eq!(expand(&container, "posts", 1), vec!["author", "tags"]);
    }

    #[test]
    fn depth_two_pre_order() {
        let container = blog();
        assert_eq!(expand(&container, "posts", 2), vec!["author", "author.posts", "tags"]);
    }

    #[test]
    fn depth_three_cycles() {
        let container = blog();
        assert_eq!(
            expand(&container, "posts", 3),
            vec![
                "author",
                "author.posts",
                "author.posts.author",
                "author.posts.tags",
                "tags",
            ]
        );
    }

    #[test]
    fn non_include_relationships_skipped() {
        let container = blog();
        assert_eq!(
            expand(&container, "users", 2),
            vec!["posts", "posts.author", "posts.tags"]
        );
    }

    #[test]
    fn zero_depth_rejected() {
        let container = blog();
        let schema = container.schema_for("posts").unwrap();
        assert_eq!(
            IncludePathExpander::new(&container, schema, 0).unwrap_err(),
            SchemaError::InvalidDepth(0)
        );
    }

    #[test]
    fn restartable() {
        let container = blog();
        let schema = container.schema_for("posts").unwrap();
        let expander = IncludePathExpander::new(&container, schema, 2).unwrap();
        let first: Vec<String> = expander.iter().collect();
        let second: Vec<String> = (&expander).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn lazy_prefix() {
        let container = blog();
        let schema = container.schema_for("posts").unwrap();
        let expander = IncludePathExpander::new(&container, schema, 50).unwrap();
        let first_three: Vec<String> = expander.iter().take(3).collect();
        assert_eq!(first_three, vec!["author", "author.posts", "author.posts.author"]);
    }
}
