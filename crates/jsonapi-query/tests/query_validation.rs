//! Query validation against the blog registry

use jsonapi_encoder::Encoder;
use jsonapi_query::{QueryError, QueryParameters, QueryValidator, Rule};
use jsonapi_schema::{Attribute, Schema, SchemaContainer};
use jsonapi_test_utils::{blog_container, sample_store};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn posts_validator() -> QueryValidator {
    QueryValidator::new(&blog_container(), "posts").unwrap()
}

#[test]
fn nested_path_beyond_depth_is_rejected() {
    let errors = posts_validator()
        .parse_query_string("include=author.posts")
        .unwrap_err();

    assert_eq!(
        errors.to_error_document().to_value().unwrap(),
        json!({
            "errors": [{
                "status": "400",
                "code": "allowed_include_paths.singular",
                "title": "Invalid Query Parameter",
                "detail": "Include path author.posts is not allowed.",
                "source": {"parameter": "include"}
            }]
        })
    );
}

#[test]
fn deeper_schema_allows_nested_path() {
    let validator = QueryValidator::new(&blog_container(), "users").unwrap();
    assert!(validator.parse_query_string("include=posts.author").is_ok());
    assert!(validator.parse_query_string("include=posts.tags").is_ok());
    assert!(validator.parse_query_string("include=posts.author.posts").is_err());
}

#[test]
fn every_invalid_field_is_reported_once() {
    let container = SchemaContainer::builder()
        .register(
            Schema::builder("posts")
                .attribute(Attribute::new("title"))
                .attribute(Attribute::new("content"))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let validator = QueryValidator::new(&container, "posts").unwrap();

    let errors = validator
        .parse_query_string("fields[posts]=badfield1,badfield2")
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    let err = errors.iter().next().unwrap();
    match err {
        QueryError::Invalid(invalid) => {
            assert_eq!(invalid.rule(), Rule::AllowedFieldSets);
            assert_eq!(invalid.invalid(), ["posts.badfield1", "posts.badfield2"]);
            assert_eq!(invalid.message_key(), "allowed_field_sets.plural");
        }
        QueryError::Parse(_) => panic!("expected a validation error"),
    }
    assert_eq!(
        err.to_string(),
        "Sparse field sets posts.badfield1, posts.badfield2 are not allowed."
    );
}

#[test]
fn hidden_and_non_include_fields() {
    let validator = posts_validator();

    let errors = validator
        .parse_query_string("fields[users]=name,password")
        .unwrap_err();
    assert_eq!(
        errors.iter().next().unwrap().to_string(),
        "Sparse field set users.password is not allowed."
    );

    let tags = QueryValidator::new(&blog_container(), "tags").unwrap();
    assert!(tags.parse_query_string("include=posts").is_err());
    assert!(tags.parse_query_string("fields[tags]=label,posts").is_ok());
}

#[test]
fn independent_parameters_accumulate() {
    let errors = posts_validator()
        .parse_query_string("include=comments.post&sort=content,-title,title&filter[slug]=x&page[cursor]=abc")
        .unwrap_err();

    let parameters: Vec<String> = errors.iter().map(QueryError::parameter).collect();
    assert_eq!(parameters, ["include", "sort", "sort", "filter", "page"]);

    let doc = errors.to_error_document();
    assert_eq!(doc.http_status(), 400);
    let details: Vec<_> = doc.errors.iter().filter_map(|e| e.detail.clone()).collect();
    assert_eq!(
        details,
        [
            "Include path comments.post is not allowed.",
            "Sort parameter content is not allowed.",
            "Sort parameter title is duplicated.",
            "Filter parameter slug is not allowed.",
            "Page parameter cursor is not allowed.",
        ]
    );
}

#[test]
fn sortable_id_and_pagination_keys() {
    let validator = posts_validator();
    assert!(validator
        .parse_query_string("sort=-id,createdAt&page[number]=2&page[size]=10&filter[author]=5")
        .is_ok());

    let comments = QueryValidator::new(&blog_container(), "comments").unwrap();
    assert!(comments.parse_query_string("page[after]=abc&page[limit]=5").is_ok());
    assert!(comments.parse_query_string("page[number]=1").is_err());
    assert!(comments.parse_query_string("sort=id").is_err());
}

#[test]
fn defaults_fill_absent_parameters() {
    let container = blog_container();
    let posts = container.schema_for("posts").unwrap();
    let validator = posts_validator();

    let absent = validator.parse_query_string("").unwrap();
    assert_eq!(absent, QueryParameters::default());
    assert_eq!(absent.sort_or_default(posts).to_string(), "-createdAt");
    assert!(absent.include_paths_or_default(posts).is_empty());

    let given = validator.parse_query_string("sort=title").unwrap();
    assert_eq!(given.sort_or_default(posts).to_string(), "title");
}

#[test]
fn validated_query_drives_the_encoder() {
    let store = sample_store();
    let post = store.post_resource(1);

    let params = posts_validator()
        .parse_query_string("include=author&fields[posts]=title,author&fields[users]=name")
        .unwrap();

    let doc = Encoder::default()
        .document()
        .with_include_paths(params.include.clone().unwrap_or_default())
        .with_field_sets(params.field_sets())
        .resource(&post)
        .unwrap();

    assert_eq!(
        doc.to_value().unwrap(),
        json!({
            "jsonapi": {"version": "1.0"},
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {"title": "JSON API"},
                "relationships": {
                    "author": {"data": {"type": "users", "id": "5"}}
                }
            },
            "included": [{
                "type": "users",
                "id": "5",
                "attributes": {"name": "Dan"}
            }]
        })
    );
}

fn allowed_posts_paths() -> Vec<String> {
    let container = blog_container();
    let posts = container.schema_for("posts").unwrap();
    posts.allowed_include_paths(&container).iter().collect()
}

proptest! {
    #[test]
    fn any_subset_of_allowed_paths_passes(mask in proptest::collection::vec(any::<bool>(), 3)) {
        let allowed = allowed_posts_paths();
        let chosen: Vec<&str> = allowed
            .iter()
            .zip(mask.iter().cycle())
            .filter(|(_, keep)| **keep)
            .map(|(path, _)| path.as_str())
            .collect();
        let query = format!("include={}", chosen.join(","));
        prop_assert!(posts_validator().parse_query_string(&query).is_ok());
    }

    #[test]
    fn every_unknown_path_is_reported(names in proptest::collection::btree_set("zz[a-z]{1,6}", 1..5)) {
        let query = format!("include=author,{}", names.iter().cloned().collect::<Vec<_>>().join(","));
        let errors = posts_validator().parse_query_string(&query).unwrap_err();

        prop_assert_eq!(errors.len(), 1);
        let err = errors.into_iter().next().unwrap();
        let QueryError::Invalid(invalid) = err else {
            return Err(TestCaseError::fail("expected a validation error"));
        };
        let reported: Vec<String> = invalid.invalid().to_vec();
        let expected: Vec<String> = names.into_iter().collect();
        prop_assert_eq!(reported, expected);
    }
}
