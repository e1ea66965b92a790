mod common;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode, header},
};
use luxe_salon_api::{
    app::build_app, config::AppConfig, media::UnconfiguredMediaHost, state::AppState,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

// Requests here are rejected before any query runs, so no database is needed.
fn offline_app(config: AppConfig) -> Router {
    build_app(AppState::new(
        DatabaseConnection::Disconnected,
        config,
        Arc::new(UnconfiguredMediaHost),
    ))
}

async fn send(request: Request<Body>) -> axum::response::Response {
    offline_app(common::test_config("postgres://unused"))
        .oneshot(request)
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let response = send(Request::get("/api/me").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        Request::get("/api/stats")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        Request::get("/api/appointments")
            .header(header::COOKIE, "luxe_session=tampered")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_404() {
    let response = send(Request::get("/api/nope").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_the_configured_frontend_with_credentials() {
    let response = send(
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/auth/login")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn malformed_bodies_get_the_json_error_envelope() {
    let response = send(post_json(
        "/api/auth/register",
        r#"{"role":"professional","name":"Ana"}"#,
    ))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let body = json_body(response).await;
    let error = body["data"]["error"].as_str().unwrap();
    assert!(error.contains("missing field"), "{error}");
    assert_eq!(body["message"].as_str(), Some(error));

    let response = send(post_json("/api/auth/login", "{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["data"]["error"].is_string());

    let response = send(
        Request::post("/api/auth/login")
            .body(Body::from(r#"{"email":"a@luxe.com","password":"x"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_attempts_are_throttled_per_client_address() {
    let mut config = common::test_config("postgres://unused");
    config.login_max_attempts = 2;
    let app = offline_app(config);

    let attempt = |ip: [u8; 4]| {
        let mut request = post_json(
            "/api/auth/login",
            r#"{"email":"ana@luxe.com","password":"secret123"}"#,
        );
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        request
    };

    // Allowed attempts reach the (absent) database; only the limiter answers 429.
    for _ in 0..2 {
        let response = app.clone().oneshot(attempt([10, 0, 0, 1])).await.unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
    let response = app.clone().oneshot(attempt([10, 0, 0, 1])).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert!(body["data"]["error"].as_str().unwrap().contains("Too many"));

    let other = app.oneshot(attempt([10, 0, 0, 2])).await.unwrap();
    assert_ne!(other.status(), StatusCode::TOO_MANY_REQUESTS);
}
