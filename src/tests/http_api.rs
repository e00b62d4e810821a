//! End-to-end API tests.
//!
//! These drive the fully assembled router (routes, auth middleware, layers)
//! through `tower::ServiceExt::oneshot`, the same composition `main` serves.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use crate::{AppState, build_app, config::ServerConfig};

const TOKEN: &str = "secret-token";
const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

fn test_app_with(config: ServerConfig) -> Router {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let state = AppState::new(config.clone());
    build_app(&config, state)
}

fn test_app() -> Router {
    test_app_with(ServerConfig::default())
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/scim+json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request("GET", uri, Some(TOKEN), None)).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(TOKEN), Some(body))).await
}

async fn put_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("PUT", uri, Some(TOKEN), Some(body))).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request("DELETE", uri, Some(TOKEN), None)).await
}

// =============================================================================
// Open Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_served_without_auth() {
    let app = test_app();
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_discovery_served_without_auth() {
    let app = test_app();

    let (status, body) = send(&app, request("GET", "/ServiceProviderConfig", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documentationUri"], "http://example.com/help/scim.html");
    assert_eq!(body["bulk"]["maxOperations"], 1000);
    assert_eq!(body["filter"]["maxResults"], 200);
    assert_eq!(body["authenticationSchemes"][0]["type"], "oauthbearertoken");

    let (status, body) = send(&app, request("GET", "/ResourceTypes", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalResults"], 2);

    let (status, body) = send(&app, request("GET", "/Schemas", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalResults"], 3);

    let (status, body) = send(&app, request("GET", "/ResourceTypes/User", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoint"], "/Users");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_auth_header_is_401() {
    let app = test_app();
    let (status, body) = send(&app, request("GET", "/Users", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["schemas"][0], ERROR_SCHEMA);
    assert_eq!(body["detail"], "Authorization header is required");
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_wrong_token_is_403() {
    let app = test_app();
    let (status, body) = send(&app, request("GET", "/Users", Some("wrong"), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid authorization token");
    assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn test_wrong_scheme_with_credential_is_403() {
    let app = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/Users")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bare_scheme_is_401() {
    let app = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/Users")
        .header(header::AUTHORIZATION, "Bearer")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_custom_token_honored() {
    let app = test_app_with(ServerConfig {
        token: "hunter2".to_string(),
        ..Default::default()
    });

    let (status, _) = send(&app, request("GET", "/Users", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("GET", "/Users", Some("hunter2"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_all_resource_methods_require_auth() {
    let app = test_app();
    for (method, uri) in [
        ("GET", "/Users"),
        ("POST", "/Users"),
        ("GET", "/Users/some-id"),
        ("PUT", "/Users/some-id"),
        ("DELETE", "/Users/some-id"),
        ("GET", "/Groups"),
        ("POST", "/Groups"),
        ("DELETE", "/Groups/some-id"),
    ] {
        let (status, _) = send(&app, request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

// =============================================================================
// User Lifecycle
// =============================================================================

#[tokio::test]
async fn test_user_create_get_replace_delete() {
    let app = test_app();

    let (status, created) = post_json(
        &app,
        "/Users",
        json!({"userName": "alice", "email": "a@x.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userName"], "alice");
    assert_eq!(created["emails"][0]["value"], "a@x.com");
    assert_eq!(created["emails"][0]["primary"], true);
    assert_eq!(created["active"], true);
    assert_eq!(created["meta"]["resourceType"], "User");
    assert_eq!(created["meta"]["created"], created["meta"]["lastModified"]);

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    assert_eq!(
        created["meta"]["location"],
        format!("http://localhost:3000/Users/{}", id)
    );

    let (status, fetched) = get(&app, &format!("/Users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, replaced) = put_json(&app, &format!("/Users/{}", id), json!({"active": false})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["active"], false);
    assert_eq!(replaced["userName"], "alice");
    assert_eq!(replaced["emails"][0]["value"], "a@x.com");
    assert_eq!(replaced["meta"]["created"], created["meta"]["created"]);
    let created_at =
        chrono::DateTime::parse_from_rfc3339(replaced["meta"]["created"].as_str().unwrap())
            .unwrap();
    let modified_at =
        chrono::DateTime::parse_from_rfc3339(replaced["meta"]["lastModified"].as_str().unwrap())
            .unwrap();
    assert!(modified_at > created_at);

    let (status, body) = delete(&app, &format!("/Users/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = get(&app, &format!("/Users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
    assert_eq!(body["status"], 404);

    // Delete is not idempotent: the second delete reports the absence
    let (status, body) = delete(&app, &format!("/Users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn test_create_user_from_empty_body() {
    let app = test_app();
    let (status, body) = send(&app, request("POST", "/Users", Some(TOKEN), None)).await;

    assert_eq!(status, StatusCode::CREATED);
    let user_name = body["userName"].as_str().unwrap();
    assert!(user_name.starts_with("user_"), "got {}", user_name);
    assert_eq!(user_name.len(), "user_".len() + 8);
    assert_eq!(body["name"]["givenName"], "Unknown");
    assert_eq!(body["name"]["familyName"], "User");
    assert_eq!(body["emails"], json!([]));
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn test_create_user_accepts_alias_spellings() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/Users",
        json!({"username": "bob", "firstName": "Bob", "lastName": "Builder"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userName"], "bob");
    assert_eq!(body["name"]["givenName"], "Bob");
    assert_eq!(body["name"]["familyName"], "Builder");
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let app = test_app();
    let (_, first) = post_json(&app, "/Users", json!({"userName": "a"})).await;
    let (_, second) = post_json(&app, "/Users", json!({"userName": "a"})).await;
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_replace_ignores_identity_and_unknown_fields() {
    let app = test_app();
    let (_, created) = post_json(&app, "/Users", json!({"userName": "alice"})).await;
    let id = created["id"].as_str().unwrap();

    let (status, replaced) = put_json(
        &app,
        &format!("/Users/{}", id),
        json!({
            "id": "forged",
            "schemas": ["urn:example:bogus"],
            "nickName": "al",
            "userName": "renamed"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["userName"], "renamed");
    assert_eq!(
        replaced["schemas"],
        json!(["urn:ietf:params:scim:schemas:core:2.0:User"])
    );
    assert!(replaced.get("nickName").is_none());
}

#[tokio::test]
async fn test_replace_missing_user_is_404() {
    let app = test_app();
    let (status, body) = put_json(&app, "/Users/nope", json!({"active": false})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

// =============================================================================
// User Listing
// =============================================================================

async fn seed_users(app: &Router, count: usize) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..count {
        let (status, body) =
            post_json(app, "/Users", json!({"userName": format!("user-{}", i)})).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    ids
}

#[tokio::test]
async fn test_list_users_defaults_and_order() {
    let app = test_app();
    seed_users(&app, 5).await;

    let (status, body) = get(&app, "/Users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalResults"], 5);
    assert_eq!(body["startIndex"], 1);
    assert_eq!(body["itemsPerPage"], 5);
    assert_eq!(
        body["schemas"][0],
        "urn:ietf:params:scim:api:messages:2.0:ListResponse"
    );

    // Creation order is list order
    for (i, resource) in body["Resources"].as_array().unwrap().iter().enumerate() {
        assert_eq!(resource["userName"], format!("user-{}", i));
    }
}

#[tokio::test]
async fn test_list_users_pagination_window() {
    let app = test_app();
    seed_users(&app, 5).await;

    let (_, body) = get(&app, "/Users?startIndex=2&count=2").await;
    assert_eq!(body["totalResults"], 5);
    assert_eq!(body["startIndex"], 2);
    assert_eq!(body["itemsPerPage"], 2);
    assert_eq!(body["Resources"][0]["userName"], "user-1");
    assert_eq!(body["Resources"][1]["userName"], "user-2");

    let (_, body) = get(&app, "/Users?startIndex=9&count=2").await;
    assert_eq!(body["totalResults"], 5);
    assert_eq!(body["itemsPerPage"], 0);
    assert_eq!(body["Resources"], json!([]));

    let (_, body) = get(&app, "/Users?count=0").await;
    assert_eq!(body["totalResults"], 5);
    assert_eq!(body["itemsPerPage"], 0);
}

#[tokio::test]
async fn test_list_users_unparseable_params_fall_back() {
    let app = test_app();
    seed_users(&app, 3).await;

    let (status, body) = get(&app, "/Users?startIndex=abc&count=xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startIndex"], 1);
    assert_eq!(body["itemsPerPage"], 3);
}

#[tokio::test]
async fn test_list_users_filter() {
    let app = test_app();
    for name in ["alice", "Alice", "bob"] {
        post_json(&app, "/Users", json!({"userName": name})).await;
    }

    let (_, body) = get(&app, "/Users?filter=userName%20eq%20%22alice%22").await;
    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["Resources"][0]["userName"], "alice");

    // Unsupported operators fall through to the full set
    let (_, body) = get(&app, "/Users?filter=userName%20co%20%22ali%22").await;
    assert_eq!(body["totalResults"], 3);

    // No match is an empty page, not an error
    let (_, body) = get(&app, "/Users?filter=userName%20eq%20%22carol%22").await;
    assert_eq!(body["totalResults"], 0);
    assert_eq!(body["Resources"], json!([]));
}

#[tokio::test]
async fn test_filter_combines_with_pagination() {
    let app = test_app();
    for i in 0..4 {
        post_json(&app, "/Users", json!({"userName": "dup"})).await;
        post_json(&app, "/Users", json!({"userName": format!("other-{}", i)})).await;
    }

    let (_, body) = get(&app, "/Users?filter=userName%20eq%20%22dup%22&startIndex=2&count=2").await;
    assert_eq!(body["totalResults"], 4);
    assert_eq!(body["itemsPerPage"], 2);
    assert_eq!(body["startIndex"], 2);
}

#[tokio::test]
async fn test_delete_keeps_remaining_order() {
    let app = test_app();
    let ids = seed_users(&app, 3).await;

    let (status, _) = delete(&app, &format!("/Users/{}", ids[1])).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/Users").await;
    assert_eq!(body["totalResults"], 2);
    assert_eq!(body["Resources"][0]["userName"], "user-0");
    assert_eq!(body["Resources"][1]["userName"], "user-2");
}

// =============================================================================
// Group Lifecycle
// =============================================================================

#[tokio::test]
async fn test_group_create_get_replace_delete() {
    let app = test_app();

    let (status, created) = post_json(
        &app,
        "/Groups",
        json!({
            "displayName": "Engineering",
            "members": [{"value": "u1", "display": "Alice"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["displayName"], "Engineering");
    assert_eq!(created["members"][0]["display"], "Alice");
    assert_eq!(created["meta"]["resourceType"], "Group");

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(
        created["meta"]["location"],
        format!("http://localhost:3000/Groups/{}", id)
    );

    let (status, fetched) = get(&app, &format!("/Groups/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // Members replace wholesale; displayName is untouched when absent
    let (status, replaced) = put_json(
        &app,
        &format!("/Groups/{}", id),
        json!({"members": [{"value": "u2"}, {"value": "u3"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["displayName"], "Engineering");
    assert_eq!(replaced["members"].as_array().unwrap().len(), 2);

    let (status, _) = delete(&app, &format!("/Groups/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &format!("/Groups/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Group not found");
}

#[tokio::test]
async fn test_create_group_alias_and_placeholder_names() {
    let app = test_app();

    let (_, body) = post_json(&app, "/Groups", json!({"name": "Sales"})).await;
    assert_eq!(body["displayName"], "Sales");

    let (_, body) = post_json(&app, "/Groups", json!({})).await;
    let display_name = body["displayName"].as_str().unwrap();
    assert!(display_name.starts_with("group_"), "got {}", display_name);
    assert_eq!(body["members"], json!([]));
}

#[tokio::test]
async fn test_list_groups_filter() {
    let app = test_app();
    for name in ["Engineering", "Sales"] {
        post_json(&app, "/Groups", json!({"displayName": name})).await;
    }

    let (_, body) = get(&app, "/Groups?filter=displayName%20eq%20%22Sales%22").await;
    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["Resources"][0]["displayName"], "Sales");
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_malformed_json_body_is_500() {
    let app = test_app();
    let req = Request::builder()
        .method("POST")
        .uri("/Users")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .header(header::CONTENT_TYPE, "application/scim+json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
    assert_eq!(body["status"], 500);
    assert_eq!(body["schemas"][0], ERROR_SCHEMA);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = test_app_with(ServerConfig {
        body_limit_bytes: 64,
        ..Default::default()
    });

    let big = json!({"userName": "x".repeat(200)});
    let (status, body) = post_json(&app, "/Users", big).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let (status, _) = get(&app, "/Bogus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_panic_becomes_scim_500() {
    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let app: Router = Router::new()
        .route("/boom", axum::routing::get(boom))
        .layer(CatchPanicLayer::custom(crate::handle_panic));

    let (status, body) = send(&app, request("GET", "/boom", None, None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
    assert_eq!(body["status"], 500);
}

// =============================================================================
// Response Shape
// =============================================================================

#[tokio::test]
async fn test_resource_responses_use_scim_content_type() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(request("GET", "/Users", Some(TOKEN), None))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/scim+json"
    );

    let response = app
        .clone()
        .oneshot(request("POST", "/Users", Some(TOKEN), Some(json!({"userName": "a"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/scim+json"
    );
}

#[tokio::test]
async fn test_meta_location_honors_public_url() {
    let app = test_app_with(ServerConfig {
        public_url: Some("https://scim.example.com".to_string()),
        ..Default::default()
    });

    let (_, body) = post_json(&app, "/Users", json!({"userName": "alice"})).await;
    let id = body["id"].as_str().unwrap();
    assert_eq!(
        body["meta"]["location"],
        format!("https://scim.example.com/Users/{}", id)
    );
}
