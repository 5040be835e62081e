//! Registration-time behavior: exact-duplicate rejection, template
//! validation, ordering, and the root partition.

use http::Method;
use routewarden::{MediaType, RegistryBuilder, RegistryError};

fn mt(s: &str) -> MediaType {
    s.parse().expect("media type")
}

#[test]
fn exact_duplicate_is_rejected_on_second_call() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/a/b/c", Method::GET, &[mt("text/plain")], "one")
        .expect("first registration");

    let err = builder
        .register("app", "/a/b/c", Method::GET, &[mt("text/plain")], "one")
        .expect_err("second registration must fail");
    assert!(matches!(
        err,
        RegistryError::DuplicateExactRegistration { .. }
    ));
    assert!(err.to_string().contains("duplicate registration"));

    // The failed call must not have registered anything.
    let registry = builder.freeze();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.conflict_count(), 0);
}

#[test]
fn duplicate_check_ignores_produces_order() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "app",
            "/items",
            Method::GET,
            &[mt("application/json"), mt("text/plain")],
            "list",
        )
        .expect("first registration");

    let err = builder
        .register(
            "app",
            "/items",
            Method::GET,
            &[mt("text/plain"), mt("application/json")],
            "list",
        )
        .expect_err("same set in different order is still a duplicate");
    assert!(matches!(
        err,
        RegistryError::DuplicateExactRegistration { .. }
    ));
}

#[test]
fn same_tuple_under_different_handler_is_allowed_and_flagged() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/f/g/h", Method::GET, &[], "first_handler")
        .expect("register");
    builder
        .register("app", "/f/g/h", Method::GET, &[], "second_handler")
        .expect("differing handler id is an overlap, not a duplicate");

    let registry = builder.freeze();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.conflict_count(), 1);
}

#[test]
fn same_tuple_under_different_root_is_allowed_and_flagged() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app-one", "/a/b/c", Method::GET, &[mt("text/plain")], "one")
        .expect("register");
    builder
        .register("app-two", "/a/b/c", Method::GET, &[mt("text/plain")], "two")
        .expect("another root may claim the same path");

    let registry = builder.freeze();
    assert_eq!(registry.conflict_count(), 1);
}

#[test]
fn invalid_template_is_rejected() {
    let mut builder = RegistryBuilder::new();
    let err = builder
        .register("app", "pets/{id}", Method::GET, &[], "get_pet")
        .expect_err("relative path must fail");
    assert!(matches!(err, RegistryError::Template(_)));

    let err = builder
        .register("app", "/pets/{}", Method::GET, &[], "get_pet")
        .expect_err("empty parameter must fail");
    assert!(matches!(err, RegistryError::Template(_)));
}

#[test]
fn registration_order_is_preserved() {
    let mut builder = RegistryBuilder::new();
    for (i, path) in ["/one", "/two", "/three"].iter().enumerate() {
        builder
            .register("app", path, Method::GET, &[], &format!("h{i}"))
            .expect("register");
    }
    let registry = builder.freeze();
    let handlers: Vec<&str> = registry
        .routes()
        .iter()
        .map(|r| r.handler_name.as_str())
        .collect();
    assert_eq!(handlers, vec!["h0", "h1", "h2"]);
    for (i, route) in registry.routes().iter().enumerate() {
        assert_eq!(route.index, i);
    }
}

#[test]
fn registry_is_partitioned_by_root() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("beta", "/b", Method::GET, &[], "b_handler")
        .expect("register");
    builder
        .register("alpha", "/a", Method::GET, &[], "a_handler")
        .expect("register");
    builder
        .register("alpha", "/a2", Method::GET, &[], "a2_handler")
        .expect("register");

    let registry = builder.freeze();
    let roots: Vec<&str> = registry.roots().collect();
    assert_eq!(roots, vec!["alpha", "beta"]);
    assert_eq!(registry.routes_for_root("alpha").len(), 2);
    assert_eq!(registry.routes_for_root("beta").len(), 1);
    assert!(registry.routes_for_root("missing").is_empty());
}

#[test]
fn empty_produces_is_stored_as_wildcard() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/anything", Method::GET, &[], "h")
        .expect("register");
    let registry = builder.freeze();
    let route = &registry.routes()[0];
    assert_eq!(route.produces.len(), 1);
    assert!(route.produces[0].is_wildcard());
}
