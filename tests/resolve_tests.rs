//! Resolution behavior: matching, parameter extraction, media negotiation,
//! and the three-stage tie-break.

use http::Method;
use routewarden::{
    MediaType, RegistryBuilder, RegistryConfig, ResolveError, RouteRegistry,
};

fn mt(s: &str) -> MediaType {
    s.parse().expect("media type")
}

fn assert_resolves_to(
    registry: &RouteRegistry,
    path: &str,
    accepted: &[MediaType],
    expected_handler: &str,
) {
    let result = registry
        .resolve(path, &Method::GET, accepted)
        .unwrap_or_else(|e| panic!("expected {path} to resolve: {e}"));
    assert_eq!(
        result.route.handler_name, expected_handler,
        "handler mismatch for {path}"
    );
}

#[test]
fn single_match_is_unambiguous() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/f/g/i", Method::GET, &[mt("text/plain")], "only")
        .expect("register");
    let registry = builder.freeze();

    let result = registry
        .resolve("/f/g/i", &Method::GET, &[mt("text/plain")])
        .expect("resolve");
    assert_eq!(result.route.handler_name, "only");
    assert!(!result.ambiguous);
    assert!(result.also_matched.is_empty());
    assert!(result.conflict.is_none());
}

#[test]
fn path_parameters_are_extracted() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "app",
            "/users/{user_id}/posts/{post_id}",
            Method::GET,
            &[],
            "get_post",
        )
        .expect("register");
    let registry = builder.freeze();

    let result = registry
        .resolve("/users/7/posts/42", &Method::GET, &[])
        .expect("resolve");
    assert_eq!(result.get_path_param("user_id"), Some("7"));
    assert_eq!(result.get_path_param("post_id"), Some("42"));
    assert_eq!(result.get_path_param("missing"), None);

    let map = result.path_params_map();
    assert_eq!(map.get("user_id").map(String::as_str), Some("7"));
}

#[test]
fn no_route_found_for_unknown_path_or_method() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/a", Method::GET, &[], "h")
        .expect("register");
    let registry = builder.freeze();

    let err = registry
        .resolve("/missing", &Method::GET, &[])
        .expect_err("unknown path");
    assert!(matches!(err, ResolveError::NoRouteFound { .. }));

    let err = registry
        .resolve("/a", &Method::POST, &[])
        .expect_err("method is matched exactly");
    assert!(matches!(err, ResolveError::NoRouteFound { .. }));
}

#[test]
fn no_route_found_when_media_types_are_disjoint() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/data", Method::GET, &[mt("text/plain")], "h")
        .expect("register");
    let registry = builder.freeze();

    let err = registry
        .resolve("/data", &Method::GET, &[mt("application/json")])
        .expect_err("produced and accepted types do not intersect");
    assert!(matches!(err, ResolveError::NoRouteFound { .. }));
}

#[test]
fn static_segments_beat_parameters_regardless_of_order() {
    // Parameterized template registered first...
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/a/{x}/c", Method::GET, &[], "param_handler")
        .expect("register");
    builder
        .register("app", "/a/b/c", Method::GET, &[], "static_handler")
        .expect("register");
    let registry = builder.freeze();
    assert_resolves_to(&registry, "/a/b/c", &[], "static_handler");

    // ...and registered last.
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/a/b/c", Method::GET, &[], "static_handler")
        .expect("register");
    builder
        .register("app", "/a/{x}/c", Method::GET, &[], "param_handler")
        .expect("register");
    let registry = builder.freeze();
    assert_resolves_to(&registry, "/a/b/c", &[], "static_handler");

    // The parameterized route still serves everything else.
    assert_resolves_to(&registry, "/a/z/c", &[], "param_handler");
}

#[test]
fn exact_media_match_beats_wildcard_regardless_of_order() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/f/g/j", Method::GET, &[mt("*/*")], "any_handler")
        .expect("register");
    builder
        .register(
            "app",
            "/f/g/j",
            Method::GET,
            &[mt("text/plain")],
            "text_handler",
        )
        .expect("register");
    let registry = builder.freeze();
    assert_resolves_to(
        &registry,
        "/f/g/j",
        &[mt("text/plain")],
        "text_handler",
    );

    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "app",
            "/f/g/j",
            Method::GET,
            &[mt("text/plain")],
            "text_handler",
        )
        .expect("register");
    builder
        .register("app", "/f/g/j", Method::GET, &[mt("*/*")], "any_handler")
        .expect("register");
    let registry = builder.freeze();
    assert_resolves_to(
        &registry,
        "/f/g/j",
        &[mt("text/plain")],
        "text_handler",
    );
}

#[test]
fn earliest_registration_wins_the_final_tie_break() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("one", "/a/b/c", Method::GET, &[mt("text/plain")], "first")
        .expect("register");
    builder
        .register("two", "/a/b/c", Method::GET, &[mt("text/plain")], "second")
        .expect("register");
    let registry = builder.freeze();

    for _ in 0..5 {
        let result = registry
            .resolve("/a/b/c", &Method::GET, &[mt("text/plain")])
            .expect("resolve");
        assert_eq!(result.route.handler_name, "first");
        assert!(result.ambiguous);
        assert_eq!(result.also_matched.len(), 1);
        assert_eq!(result.also_matched[0].handler_name, "second");
    }
}

#[test]
fn wildcard_accept_matches_any_produced_type() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "app",
            "/data",
            Method::GET,
            &[mt("application/json")],
            "json_handler",
        )
        .expect("register");
    let registry = builder.freeze();

    assert_resolves_to(&registry, "/data", &[mt("*/*")], "json_handler");
    // An empty accept list behaves the same way.
    assert_resolves_to(&registry, "/data", &[], "json_handler");
}

#[test]
fn trailing_slash_is_lenient_by_default() {
    let mut builder = RegistryBuilder::new();
    builder
        .register("app", "/a/b", Method::GET, &[], "h")
        .expect("register");
    let registry = builder.freeze();

    assert_resolves_to(&registry, "/a/b", &[], "h");
    assert_resolves_to(&registry, "/a/b/", &[], "h");
}

#[test]
fn strict_slash_keeps_variants_distinct() {
    let config = RegistryConfig {
        strict_slash: true,
        ..RegistryConfig::default()
    };
    let mut builder = RegistryBuilder::with_config(config);
    builder
        .register("app", "/a/b/", Method::GET, &[], "with_slash")
        .expect("register");
    builder
        .register("app", "/a/b", Method::GET, &[], "without_slash")
        .expect("register");
    let registry = builder.freeze();

    // No overlap in strict mode: these are two different routes.
    assert_eq!(registry.conflict_count(), 0);
    assert_resolves_to(&registry, "/a/b/", &[], "with_slash");
    assert_resolves_to(&registry, "/a/b", &[], "without_slash");
}
