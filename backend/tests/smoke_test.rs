//! Integration tests driving the full router against a mocked
//! Keycloak server.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use realmboard_backend::routes;
use realmboard_backend::test_util::{mock_keycloak, test_state};

const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";
const USERS_PATH: &str = "/admin/realms/test-realm/users";

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::token_json()))
        .mount(server)
        .await;
}

fn build_app(server: &MockServer) -> Router {
    let state = Arc::new(test_state(&server.uri()));
    Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router(state.clone()))
        .merge(routes::dashboard::router(state.clone()))
        .merge(routes::login::router(state.clone()))
        .merge(routes::cache::router(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, http::HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Bytes) {
    let (status, _, body) = send(app, Method::GET, uri, None).await;
    (status, body)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = build_app(&server);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_users_forwards_pagination_offset() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("first", "10"))
        .and(query_param("max", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/count", USERS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .expect(1)
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) = get_json(&app, "/api/users?page=2&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 5);
    assert_eq!(body["totalUsers"], 42);
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
    assert_eq!(body["pages"], json!([1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_list_users_forwards_attribute_filter() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("attribute.utmSource", "google"))
        .and(query_param("emailVerified", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/count", USERS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) =
        get_json(&app, "/api/users?utm_source=google&emailVerified=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 0);
    assert_eq!(body["pages"], json!([]));
}

#[tokio::test]
async fn test_token_is_cached_across_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::token_json()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .expect(2)
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (first, _) = get(&app, "/api/allusers").await;
    let (second, _) = get(&app, "/api/allusers").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
}

#[tokio::test]
async fn test_all_users_passthrough() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) = get_json(&app, "/api/allusers").await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0]["id"], "u1");
    assert_eq!(users[0]["emailVerified"], true);
    assert_eq!(users[0]["attributes"]["utm_source"], json!(["google"]));
}

#[tokio::test]
async fn test_cached_user_skips_full_fetch() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    // Brief metadata fetch, issued on every request.
    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param("briefRepresentation", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "jdoe",
            "updatedTimestamp": 1700000100000i64
        })))
        .expect(2)
        .mount(&server)
        .await;

    // Full fetch must happen exactly once; the second request is
    // served from the cache because the timestamps match.
    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param_is_missing("briefRepresentation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_keycloak::user_json("u1", "jdoe", true, true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (first_status, first_body) = get(&app, "/api/users/u1").await;
    let (second_status, second_body) = get(&app, "/api/users/u1").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first_body, second_body);
}

#[tokio::test]
async fn test_stale_cache_entry_triggers_full_fetch() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    // Metadata timestamp never matches the cached record's.
    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param("briefRepresentation", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "updatedTimestamp": 999i64
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param_is_missing("briefRepresentation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_keycloak::user_json("u1", "jdoe", true, true)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let app = build_app(&server);
    get(&app, "/api/users/u1").await;
    let (status, _) = get(&app, "/api/users/u1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param("briefRepresentation", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "updatedTimestamp": 1700000100000i64
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/u1", USERS_PATH)))
        .and(query_param_is_missing("briefRepresentation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_keycloak::user_json("u1", "jdoe", true, true)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let app = build_app(&server);
    get(&app, "/api/users/u1").await;

    let (status, _, body) = send(&app, Method::POST, "/api/clear-cache", Some("{}")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Cache cleared successfully");

    let (status, _) = get(&app, "/api/users/u1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_single_user_mirrors_upstream_status() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/missing", USERS_PATH)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) = get_json(&app, "/api/users/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_upstream_failure_collapses_to_500() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) = get_json(&app, "/api/users").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let server = MockServer::start().await;
    let app = build_app(&server);

    for body in ["{}", r#"{"email":"dash@example.com"}"#, r#"{"email":"","password":""}"#] {
        let (status, _, bytes) = send(&app, Method::POST, "/api/login", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Email and password are required.");
    }
}

#[tokio::test]
async fn test_login_rejects_wrong_credentials() {
    let server = MockServer::start().await;
    let app = build_app(&server);

    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(r#"{"email":"dash@example.com","password":"wrong"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Invalid email or password.");
}

#[tokio::test]
async fn test_login_accepts_configured_credentials() {
    let server = MockServer::start().await;
    let app = build_app(&server);

    let (status, _, bytes) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(r#"{"email":"dash@example.com","password":"dash-secret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Login successful.");
    assert_eq!(json["user"]["id"], 1);
    assert_eq!(json["user"]["email"], "dash@example.com");
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, headers, body) = send(&app, Method::GET, "/api/users/export", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("users.csv"));

    let csv = String::from_utf8(body.to_vec()).unwrap();
    // header plus one line per record
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("ID,Username,"));
}

#[tokio::test]
async fn test_export_applies_filters() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, _, body) = send(
        &app,
        Method::GET,
        "/api/users/export?emailVerified=Verified",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(body.to_vec()).unwrap();
    // two of the three fixture users are verified
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("pending"));
}

#[tokio::test]
async fn test_dashboard_summary() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_keycloak::users_json()))
        .mount(&server)
        .await;

    let app = build_app(&server);
    let (status, body) = get_json(&app, "/api/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    let summary = &body["summary"];
    assert_eq!(summary["totalUsers"], 3);
    assert_eq!(summary["verifiedEmails"]["count"], 2);
    assert_eq!(summary["verifiedEmails"]["percentage"], "66.67%");
    assert_eq!(summary["unverifiedEmails"]["count"], 1);
    assert_eq!(summary["enabledAccounts"]["count"], 2);
    assert_eq!(summary["totpEnabled"]["count"], 0);
    assert_eq!(summary["usersNeedingVerification"], 1);
}
