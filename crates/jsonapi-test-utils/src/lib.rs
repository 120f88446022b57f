//! Testing utilities for the JSON:API workspace
//!
//! A small blog domain: schemas, in-memory records and resource wrappers.

#![allow(missing_docs)]

use jsonapi_document::ResourceIdentifier;
use jsonapi_encoder::{Attributes, JsonApiResource, Relation, RelationData};
use jsonapi_path::{FieldSets, IncludePaths};
use jsonapi_schema::{Attribute, Pagination, RegistryDefinition, Relationship, Schema, SchemaContainer};
use serde_json::json;

/// The blog registry in its TOML form; equal to [`blog_container`]
pub const BLOG_REGISTRY_TOML: &str = r#"
[[schemas]]
type = "posts"
sortable_id = true
filters = ["title", "author"]
pagination = { kind = "page" }
default_sort = "-createdAt"
attributes = [
    { name = "title", sortable = true },
    { name = "content" },
    { name = "slug" },
    { name = "createdAt", sortable = true },
]
relationships = [
    { name = "author", type = "users", cardinality = "to_one" },
    { name = "tags", type = "tags", cardinality = "to_many" },
    { name = "comments", type = "comments", cardinality = "to_many" },
]

[[schemas]]
type = "users"
max_depth = 2
attributes = [
    { name = "name", sortable = true },
    { name = "email" },
    { name = "password", sparse_field = false },
]
relationships = [
    { name = "posts", type = "posts", cardinality = "to_many" },
]

[[schemas]]
type = "tags"
attributes = [{ name = "label", sortable = true }]
relationships = [
    { name = "posts", type = "posts", cardinality = "to_many", include_path = false },
]

[[schemas]]
type = "comments"
pagination = { kind = "cursor" }
attributes = [{ name = "body" }]
relationships = [
    { name = "author", type = "users", cardinality = "to_one" },
    { name = "post", type = "posts", cardinality = "to_one" },
]
"#;

pub fn posts_schema() -> Schema {
    Schema::builder("posts")
        .attribute(Attribute::new("title").sortable())
        .attribute(Attribute::new("content"))
        .attribute(Attribute::new("slug"))
        .attribute(Attribute::new("createdAt").sortable())
        .relationship(Relationship::to_one("author", "users"))
        .relationship(Relationship::to_many("tags", "tags"))
        .relationship(Relationship::to_many("comments", "comments"))
        .sortable_id()
        .filter("title")
        .filter("author")
        .pagination(Pagination::page())
        .default_sort("-createdAt".parse().unwrap())
        .build()
        .unwrap()
}

pub fn users_schema() -> Schema {
    Schema::builder("users")
        .attribute(Attribute::new("name").sortable())
        .attribute(Attribute::new("email"))
        .attribute(Attribute::new("password").not_sparse_field())
        .relationship(Relationship::to_many("posts", "posts"))
        .max_depth(2)
        .build()
        .unwrap()
}

pub fn tags_schema() -> Schema {
    Schema::builder("tags")
        .attribute(Attribute::new("label").sortable())
        .relationship(Relationship::to_many("posts", "posts").not_include_path())
        .build()
        .unwrap()
}

pub fn comments_schema() -> Schema {
    Schema::builder("comments")
        .attribute(Attribute::new("body"))
        .relationship(Relationship::to_one("author", "users"))
        .relationship(Relationship::to_one("post", "posts"))
        .pagination(Pagination::cursor())
        .build()
        .unwrap()
}

pub fn blog_container() -> SchemaContainer {
    SchemaContainer::builder()
        .register(posts_schema())
        .register(users_schema())
        .register(tags_schema())
        .register(comments_schema())
        .build()
        .unwrap()
}

pub fn blog_container_from_toml() -> SchemaContainer {
    let definition: RegistryDefinition = toml::from_str(BLOG_REGISTRY_TOML).unwrap();
    SchemaContainer::from_definitions(definition).unwrap()
}

pub fn include(raw: &str) -> IncludePaths {
    raw.parse().unwrap()
}

pub fn fields<const N: usize>(pairs: [(&str, &str); N]) -> FieldSets {
    FieldSets::from_pairs(pairs)
}

pub fn identifier(resource_type: &str, id: &str) -> ResourceIdentifier {
    ResourceIdentifier::new(resource_type, id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub post_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub draft: bool,
    pub author_id: Option<u64>,
    pub tag_ids: Vec<u64>,
    pub comment_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
    pub post_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogStore {
    pub users: Vec<User>,
    pub tags: Vec<Tag>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl BlogStore {
    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn tag(&self, id: u64) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn comment(&self, id: u64) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn post_resource(&self, id: u64) -> PostResource<'_> {
        PostResource {
            post: self.post(id).unwrap(),
            store: self,
        }
    }

    pub fn post_resources(&self) -> Vec<PostResource<'_>> {
        self.posts.iter().map(|post| PostResource { post, store: self }).collect()
    }

    pub fn user_resource(&self, id: u64) -> UserResource<'_> {
        UserResource {
            user: self.user(id).unwrap(),
            store: self,
        }
    }
}

/// Users 5 and 6, tags 1 and 2, posts 1-3, comments 10-12
///
/// Post 1 is written by user 5, tagged 1 and 2, and commented on by
/// users 6 and 5. User 5 also wrote post 2; user 6 wrote post 3.
pub fn sample_store() -> BlogStore {
    let user = |id, name: &str, post_ids: Vec<u64>| User {
        id,
        name: name.to_string(),
        email: format!("{}@blog.test", name.to_lowercase()),
        password: "hunter2".to_string(),
        post_ids,
    };
    let tag = |id, label: &str| Tag {
        id,
        label: label.to_string(),
    };
    let post = |id, title: &str, author_id, tag_ids: Vec<u64>, comment_ids: Vec<u64>| Post {
        id,
        title: title.to_string(),
        content: format!("All about {}", title.to_lowercase()),
        created_at: format!("2024-01-0{id}T00:00:00Z"),
        draft: false,
        author_id: Some(author_id),
        tag_ids,
        comment_ids,
    };
    let comment = |id, body: &str, author_id, post_id| Comment {
        id,
        body: body.to_string(),
        author_id,
        post_id,
    };

    BlogStore {
        users: vec![user(5, "Dan", vec![1, 2]), user(6, "Eve", vec![3])],
        tags: vec![tag(1, "rust"), tag(2, "serde")],
        posts: vec![
            post(1, "JSON API", 5, vec![1, 2], vec![10, 11]),
            post(2, "Sparse Fields", 5, vec![2], vec![]),
            post(3, "Include Paths", 6, vec![1], vec![12]),
        ],
        comments: vec![
            comment(10, "Nice", 6, 1),
            comment(11, "Thanks", 5, 1),
            comment(12, "+1", 5, 3),
        ],
    }
}

fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

#[derive(Debug, Clone, Copy)]
pub struct PostResource<'a> {
    pub post: &'a Post,
    pub store: &'a BlogStore,
}

impl JsonApiResource for PostResource<'_> {
    fn resource_type(&self) -> &str {
        "posts"
    }

    fn id(&self) -> Option<String> {
        Some(self.post.id.to_string())
    }

    fn attributes(&self) -> Attributes<'_> {
        Attributes::new()
            .value("title", self.post.title.as_str())
            .value("content", self.post.content.as_str())
            .lazy("slug", || json!(slugify(&self.post.title)))
            .value("createdAt", self.post.created_at.as_str())
            .when("draft", self.post.draft, json!(true))
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        let store = self.store;
        let author = self
            .post
            .author_id
            .and_then(|id| store.user(id))
            .map(|user| UserResource { user, store });
        let tags = self
            .post
            .tag_ids
            .iter()
            .filter_map(|&id| store.tag(id))
            .map(|tag| TagResource { tag });
        let comment_ids = &self.post.comment_ids;

        vec![
            Relation::to_one("author").optional_resource(author),
            Relation::to_many("tags").resources(tags),
            Relation::to_many("comments").lazy(move || {
                RelationData::resources(
                    comment_ids
                        .iter()
                        .filter_map(|&id| store.comment(id))
                        .map(|comment| CommentResource { comment, store }),
                )
            }),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UserResource<'a> {
    pub user: &'a User,
    pub store: &'a BlogStore,
}

impl JsonApiResource for UserResource<'_> {
    fn resource_type(&self) -> &str {
        "users"
    }

    fn id(&self) -> Option<String> {
        Some(self.user.id.to_string())
    }

    fn attributes(&self) -> Attributes<'_> {
        Attributes::new()
            .value("name", self.user.name.as_str())
            .value("email", self.user.email.as_str())
            .skip("password")
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        let store = self.store;
        let posts = self
            .user
            .post_ids
            .iter()
            .filter_map(|&id| store.post(id))
            .map(|post| PostResource { post, store });
        vec![Relation::to_many("posts").resources(posts)]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagResource<'a> {
    pub tag: &'a Tag,
}

impl JsonApiResource for TagResource<'_> {
    fn resource_type(&self) -> &str {
        "tags"
    }

    fn id(&self) -> Option<String> {
        Some(self.tag.id.to_string())
    }

    fn attributes(&self) -> Attributes<'_> {
        Attributes::new().value("label", self.tag.label.as_str())
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        vec![Relation::to_many("posts")]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommentResource<'a> {
    pub comment: &'a Comment,
    pub store: &'a BlogStore,
}

impl JsonApiResource for CommentResource<'_> {
    fn resource_type(&self) -> &str {
        "comments"
    }

    fn id(&self) -> Option<String> {
        Some(self.comment.id.to_string())
    }

    fn attributes(&self) -> Attributes<'_> {
        Attributes::new().value("body", self.comment.body.as_str())
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        let store = self.store;
        let author = store
            .user(self.comment.author_id)
            .map(|user| UserResource { user, store });
        vec![
            Relation::to_one("author").optional_resource(author),
            Relation::to_one("post")
                .data(RelationData::Identifier(ResourceIdentifier::new(
                    "posts",
                    self.comment.post_id.to_string(),
                )))
                .show_data_always(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_code_registries_agree() {
        assert_eq!(blog_container(), blog_container_from_toml());
    }

    #[test]
    fn sample_store_is_consistent() {
        let store = sample_store();
        for post in &store.posts {
            let author = store.user(post.author_id.unwrap()).unwrap();
            assert!(author.post_ids.contains(&post.id));
            for id in &post.comment_ids {
                assert_eq!(store.comment(*id).unwrap().post_id, post.id);
            }
        }
    }
}
