//! Include-path expansion over registries loaded from TOML

use jsonapi_schema::{RegistryDefinition, SchemaContainer, SchemaError};
use proptest::prelude::*;

const BLOG: &str = r#"
[[schemas]]
type = "posts"
max_depth = 2
default_include = "author"
default_sort = "-title"
filters = ["title", "author"]
pagination = { kind = "page" }
attributes = [
    { name = "title", sortable = true },
    { name = "content" },
]
relationships = [
    { name = "author", type = "users", cardinality = "to_one" },
    { name = "comments", type = "comments", cardinality = "to_many" },
]

[[schemas]]
type = "users"
attributes = [{ name = "name" }, { name = "password", sparse_field = false }]
relationships = [
    { name = "posts", type = "posts", cardinality = "to_many" },
]

[[schemas]]
type = "comments"
relationships = [
    { name = "author", type = "users", cardinality = "to_one" },
    { name = "post", type = "posts", cardinality = "to_one", include_path = false },
]
"#;

fn blog() -> SchemaContainer {
    let definition: RegistryDefinition = toml::from_str(BLOG).unwrap();
    SchemaContainer::from_definitions(definition).unwrap()
}

#[test]
fn toml_registry_loads() {
    let container = blog();
    assert_eq!(container.types().collect::<Vec<_>>(), vec!["posts", "users", "comments"]);

    let posts = container.schema_for("posts").unwrap();
    assert_eq!(posts.max_depth(), 2);
    assert_eq!(posts.default_include_paths().to_string(), "author");
    assert_eq!(posts.default_sort().to_string(), "-title");
    assert_eq!(posts.filter_keys(), vec!["title", "author"]);
    assert_eq!(posts.pagination().unwrap().keys(), vec!["number", "size"]);

    let users = container.schema_for("users").unwrap();
    assert_eq!(users.sparse_fields(), vec!["name", "posts"]);
}

#[test]
fn allowed_paths_follow_max_depth() {
    let container = blog();
    let posts = container.schema_for("posts").unwrap();
    let paths: Vec<String> = posts.allowed_include_paths(&container).iter().collect();
    assert_eq!(
        paths,
        vec!["author", "author.posts", "comments", "comments.author"]
    );

    let users = container.schema_for("users").unwrap();
    let paths: Vec<String> = users.allowed_include_paths(&container).iter().collect();
    assert_eq!(paths, vec!["posts"]);
}

#[test]
fn unknown_inverse_in_toml() {
    let definition: RegistryDefinition = toml::from_str(
        r#"
        [[schemas]]
        type = "posts"
        relationships = [{ name = "author", type = "people", cardinality = "to_one" }]
        "#,
    )
    .unwrap();

    assert!(matches!(
        SchemaContainer::from_definitions(definition),
        Err(SchemaError::UnknownInverse { inverse, .. }) if inverse == "people"
    ));
}

#[test]
fn zero_depth_in_toml() {
    let definition: RegistryDefinition = toml::from_str(
        r#"
        [[schemas]]
        type = "posts"
        max_depth = 0
        "#,
    )
    .unwrap();

    assert_eq!(
        SchemaContainer::from_definitions(definition).unwrap_err(),
        SchemaError::InvalidDepth(0)
    );
}

proptest! {
    #[test]
    fn prop_depth_bound_on_cycles(depth in 1..7usize) {
        let container = blog();
        let posts = container.schema_for("posts").unwrap();
        let paths: Vec<String> = posts.include_paths(&container, depth).unwrap().iter().collect();

        prop_assert!(!paths.is_empty());
        for path in &paths {
            prop_assert!(path.split('.').count() <= depth);
        }
        prop_assert_eq!(paths.iter().map(|p| p.split('.').count()).max(), Some(depth));

        let deeper: Vec<String> = posts.include_paths(&container, depth + 1).unwrap().iter().collect();
        prop_assert!(deeper.len() > paths.len());
        for path in &paths {
            prop_assert!(deeper.contains(path));
        }
    }

    #[test]
    fn prop_parents_precede_children(depth in 1..6usize) {
        let container = blog();
        let posts = container.schema_for("posts").unwrap();
        let paths: Vec<String> = posts.include_paths(&container, depth).unwrap().iter().collect();

        for (index, path) in paths.iter().enumerate() {
            if let Some((parent, _)) = path.rsplit_once('.') {
                let parent_index = paths.iter().position(|p| p == parent);
                prop_assert!(matches!(parent_index, Some(i) if i < index));
            }
        }
    }
}
