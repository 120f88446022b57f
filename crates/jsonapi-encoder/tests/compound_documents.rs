//! Compound document encoding against the blog fixtures

use jsonapi_document::{Links, Link, Meta, ResourceIdentifier};
use jsonapi_encoder::{
    Attributes, DocumentStructureError, EncodeError, Encoder, EncoderConfig, JsonApiResource, Relation,
    RelationData,
};
use jsonapi_path::IncludePaths;
use jsonapi_test_utils::{fields, identifier, include, sample_store};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::Cell;
use std::collections::HashSet;

#[test]
fn scenario_include_author_and_tags() {
    let store = sample_store();
    let post = store.post_resource(1);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author,tags"))
        .resource(&post)
        .unwrap();

    assert_eq!(
        doc.to_value().unwrap(),
        json!({
            "jsonapi": {"version": "1.0"},
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {
                    "title": "JSON API",
                    "content": "All about json api",
                    "slug": "json-api",
                    "createdAt": "2024-01-01T00:00:00Z"
                },
                "relationships": {
                    "author": {"data": {"type": "users", "id": "5"}},
                    "tags": {"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]}
                }
            },
            "included": [
                {
                    "type": "users",
                    "id": "5",
                    "attributes": {"name": "Dan", "email": "dan@blog.test"}
                },
                {"type": "tags", "id": "1", "attributes": {"label": "rust"}},
                {"type": "tags", "id": "2", "attributes": {"label": "serde"}}
            ]
        })
    );
}

#[test]
fn scenario_sparse_fieldset_drops_relationships() {
    let store = sample_store();
    let post = store.post_resource(1);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author,tags"))
        .with_field_sets(fields([("posts", "title")]))
        .resource(&post)
        .unwrap();

    let value = doc.to_value().unwrap();
    assert_eq!(value["data"]["attributes"], json!({"title": "JSON API"}));
    assert!(value["data"].get("relationships").is_none());
    assert!(value.get("included").is_none());
}

#[test]
fn resource_reachable_twice_is_included_once() {
    let store = sample_store();
    let posts = store.post_resources();

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author,tags"))
        .resources(&posts)
        .unwrap();

    assert_eq!(
        doc.included_identifiers(),
        vec![
            identifier("users", "5"),
            identifier("tags", "1"),
            identifier("tags", "2"),
            identifier("users", "6"),
        ]
    );

    let unique: HashSet<ResourceIdentifier> = doc.included_identifiers().into_iter().collect();
    assert_eq!(unique.len(), doc.included.len());
}

#[test]
fn primary_data_never_repeated_in_included() {
    let store = sample_store();
    let user = store.user_resource(5);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("posts.author"))
        .resource(&user)
        .unwrap();

    assert_eq!(
        doc.included_identifiers(),
        vec![identifier("posts", "1"), identifier("posts", "2")]
    );

    let value = doc.to_value().unwrap();
    assert_eq!(
        value["included"][0]["relationships"]["author"]["data"],
        json!({"type": "users", "id": "5"})
    );
}

#[test]
fn nested_includes_in_pre_order() {
    let store = sample_store();
    let post = store.post_resource(1);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author.posts,comments.author"))
        .resource(&post)
        .unwrap();

    assert_eq!(
        doc.included_identifiers(),
        vec![
            identifier("users", "5"),
            identifier("posts", "2"),
            identifier("comments", "10"),
            identifier("users", "6"),
            identifier("comments", "11"),
        ]
    );

    let value = doc.to_value().unwrap();
    assert_eq!(
        value["data"]["relationships"],
        json!({
            "author": {"data": {"type": "users", "id": "5"}},
            "comments": {"data": [{"type": "comments", "id": "10"}, {"type": "comments", "id": "11"}]}
        })
    );

    let user = doc.find_included("users", "5").unwrap();
    assert_eq!(
        serde_json::to_value(&user.relationships["posts"]).unwrap(),
        json!({"data": [{"type": "posts", "id": "1"}, {"type": "posts", "id": "2"}]})
    );

    // Always-shown linkage, not included
    let comment = doc.find_included("comments", "10").unwrap();
    assert_eq!(
        serde_json::to_value(&comment.relationships["post"]).unwrap(),
        json!({"data": {"type": "posts", "id": "1"}})
    );
}

#[test]
fn resource_reached_again_at_deeper_path_is_walked_again() {
    let store = sample_store();
    let post = store.post_resource(1);

    // users/5 is first included at `author`, which requests nothing below it;
    // reaching it again through `comments.author` must still follow `posts`.
    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author,comments.author.posts"))
        .resource(&post)
        .unwrap();

    assert_eq!(
        doc.included_identifiers(),
        vec![
            identifier("users", "5"),
            identifier("comments", "10"),
            identifier("users", "6"),
            identifier("posts", "3"),
            identifier("comments", "11"),
            identifier("posts", "2"),
        ]
    );

    let user = doc.find_included("users", "5").unwrap();
    assert_eq!(
        serde_json::to_value(&user.relationships).unwrap(),
        json!({"posts": {"data": [{"type": "posts", "id": "1"}, {"type": "posts", "id": "2"}]}})
    );

    let other = doc.find_included("users", "6").unwrap();
    assert_eq!(
        serde_json::to_value(&other.relationships["posts"]).unwrap(),
        json!({"data": [{"type": "posts", "id": "3"}]})
    );
}

#[test]
fn primary_reached_again_contributes_its_deeper_includes() {
    let store = sample_store();
    let user = store.user_resource(5);

    // The primary user is reached again at `posts.author`, where `posts`
    // is requested once more.
    let doc = Encoder::default()
        .document()
        .with_include_paths(include("posts.author.posts.tags"))
        .resource(&user)
        .unwrap();

    assert_eq!(
        doc.included_identifiers(),
        vec![
            identifier("posts", "1"),
            identifier("tags", "1"),
            identifier("tags", "2"),
            identifier("posts", "2"),
        ]
    );

    let value = doc.to_value().unwrap();
    assert_eq!(
        value["data"]["relationships"]["posts"]["data"],
        json!([{"type": "posts", "id": "1"}, {"type": "posts", "id": "2"}])
    );
    let post = doc.find_included("posts", "1").unwrap();
    assert_eq!(
        serde_json::to_value(&post.relationships["tags"]).unwrap(),
        json!({"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]})
    );
}

#[test]
fn fieldset_absent_versus_empty() {
    let store = sample_store();
    let post = store.post_resource(1);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author"))
        .with_field_sets(fields([("posts", "")]))
        .resource(&post)
        .unwrap();

    let value = doc.to_value().unwrap();
    assert_eq!(value["data"], json!({"type": "posts", "id": "1"}));
    assert_eq!(value.get("included"), None);

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("author"))
        .with_field_sets(fields([("users", "")]))
        .resource(&post)
        .unwrap();

    let value = doc.to_value().unwrap();
    assert_eq!(value["data"]["attributes"]["title"], json!("JSON API"));
    assert_eq!(value["included"], json!([{"type": "users", "id": "5"}]));
}

#[test]
fn explicit_empty_include() {
    let store = sample_store();
    let post = store.post_resource(1);

    let empty: IncludePaths = "".parse().unwrap();
    assert!(empty.is_empty());

    let doc = Encoder::default()
        .document()
        .with_include_paths(empty)
        .resource(&post)
        .unwrap();

    let value = doc.to_value().unwrap();
    assert!(value.get("included").is_none());
    assert!(value["data"].get("relationships").is_none());
}

#[test]
fn default_links_from_base_uri() {
    let store = sample_store();
    let post = store.post_resource(2);
    let encoder = Encoder::new(EncoderConfig::new().with_base_uri("https://api.test"));

    let doc = encoder
        .document()
        .with_field_sets(fields([("posts", "author")]))
        .with_links(Links::new().with("self", Link::new("https://api.test/posts/2")))
        .with_meta(Meta::new().with("requestId", "r-1"))
        .resource(&post)
        .unwrap();

    assert_eq!(
        doc.to_value().unwrap(),
        json!({
            "jsonapi": {"version": "1.0"},
            "data": {
                "type": "posts",
                "id": "2",
                "relationships": {
                    "author": {"links": {
                        "self": "https://api.test/posts/2/relationships/author",
                        "related": "https://api.test/posts/2/author"
                    }}
                },
                "links": {"self": "https://api.test/posts/2"}
            },
            "links": {"self": "https://api.test/posts/2"},
            "meta": {"requestId": "r-1"}
        })
    );
}

#[test]
fn collection_without_version() {
    let store = sample_store();
    let posts = store.post_resources();
    let encoder = Encoder::new(EncoderConfig::new().without_version());

    let doc = encoder
        .document()
        .with_field_sets(fields([("posts", "title")]))
        .resources(&posts)
        .unwrap();

    assert_eq!(
        doc.to_value().unwrap(),
        json!({
            "data": [
                {"type": "posts", "id": "1", "attributes": {"title": "JSON API"}},
                {"type": "posts", "id": "2", "attributes": {"title": "Sparse Fields"}},
                {"type": "posts", "id": "3", "attributes": {"title": "Include Paths"}}
            ]
        })
    );
}

#[derive(Clone, Copy)]
enum Pinned {
    Null,
    ListForToOne,
    NestedLazy,
    WithoutId,
}

struct Ghost;

impl JsonApiResource for Ghost {
    fn resource_type(&self) -> &str {
        "ghosts"
    }

    fn id(&self) -> Option<String> {
        None
    }
}

fn pinned<'a>(kind: Pinned) -> Relation<'a> {
    let relation = Relation::to_one("pinned").show_data_always();
    match kind {
        Pinned::Null => relation.data(RelationData::Null),
        Pinned::ListForToOne => {
            relation.data(RelationData::Identifiers(vec![ResourceIdentifier::new("posts", "1")]))
        }
        Pinned::NestedLazy => relation.lazy(|| RelationData::Lazy(Box::new(|| RelationData::Null))),
        Pinned::WithoutId => relation.resource(Ghost),
    }
}

struct Profile<'a> {
    evaluated: &'a Cell<u32>,
    pinned: Pinned,
}

impl JsonApiResource for Profile<'_> {
    fn resource_type(&self) -> &str {
        "profiles"
    }

    fn id(&self) -> Option<String> {
        Some("p1".to_string())
    }

    fn attributes(&self) -> Attributes<'_> {
        Attributes::new()
            .value("handle", "dan")
            .merge_when(
                true,
                Attributes::new()
                    .value("bio", "Writes Rust")
                    .lazy("followers", || {
                        self.evaluated.set(self.evaluated.get() + 1);
                        json!(42)
                    }),
            )
            .merge_when(false, Attributes::new().value("hidden", true))
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        let evaluated = self.evaluated;
        vec![
            pinned(self.pinned),
            Relation::to_one("avatar").lazy(move || {
                evaluated.set(evaluated.get() + 10);
                RelationData::Identifier(ResourceIdentifier::new("images", "1"))
            }),
        ]
    }
}

fn encode_profile(kind: Pinned) -> Result<serde_json::Value, EncodeError> {
    let evaluated = Cell::new(0);
    let profile = Profile {
        evaluated: &evaluated,
        pinned: kind,
    };
    let doc = Encoder::default().document().resource(&profile)?;
    Ok(doc.to_value().unwrap())
}

#[test]
fn merged_attributes_are_gated_individually() {
    let evaluated = Cell::new(0);
    let profile = Profile {
        evaluated: &evaluated,
        pinned: Pinned::Null,
    };

    let doc = Encoder::default()
        .document()
        .with_field_sets(fields([("profiles", "handle,bio,pinned")]))
        .resource(&profile)
        .unwrap();

    let value = doc.to_value().unwrap();
    assert_eq!(value["data"]["attributes"], json!({"handle": "dan", "bio": "Writes Rust"}));
    assert_eq!(value["data"]["relationships"], json!({"pinned": {"data": null}}));
    assert_eq!(evaluated.get(), 0);

    let doc = Encoder::default().document().resource(&profile).unwrap();
    let value = doc.to_value().unwrap();
    assert_eq!(value["data"]["attributes"]["followers"], json!(42));
    assert!(value["data"]["attributes"].get("hidden").is_none());
    // Avatar linkage is neither requested nor always shown
    assert_eq!(evaluated.get(), 1);
}

#[test]
fn lazy_relation_resolved_when_included() {
    let evaluated = Cell::new(0);
    let profile = Profile {
        evaluated: &evaluated,
        pinned: Pinned::Null,
    };

    let doc = Encoder::default()
        .document()
        .with_include_paths(include("avatar"))
        .with_field_sets(fields([("profiles", "avatar")]))
        .resource(&profile)
        .unwrap();

    assert_eq!(evaluated.get(), 10);
    let value = doc.to_value().unwrap();
    assert_eq!(
        value["data"]["relationships"]["avatar"]["data"],
        json!({"type": "images", "id": "1"})
    );
    assert!(value.get("included").is_none());
}

#[test]
fn cardinality_mismatch_is_structure_error() {
    let err = encode_profile(Pinned::ListForToOne).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::DocumentStructure(DocumentStructureError::CardinalityMismatch { ref relationship, .. })
            if relationship == "pinned"
    ));
    assert_eq!(err.to_error_object().status.as_deref(), Some("500"));
}

#[test]
fn nested_lazy_is_structure_error() {
    assert_eq!(
        encode_profile(Pinned::NestedLazy).unwrap_err(),
        EncodeError::DocumentStructure(DocumentStructureError::NestedLazy {
            relationship: "pinned".into()
        })
    );
}

#[test]
fn related_resource_without_id_is_structure_error() {
    assert_eq!(
        encode_profile(Pinned::WithoutId).unwrap_err(),
        EncodeError::DocumentStructure(DocumentStructureError::MissingId {
            resource_type: "ghosts".into()
        })
    );
}
