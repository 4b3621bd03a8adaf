#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use propdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use propdesk_api::config::ServerConfig;
use propdesk_api::router::build_app_router;
use propdesk_api::state::AppState;
use propdesk_core::roles::Role;
use propdesk_core::types::DbId;

pub const ADMIN: DbId = 1;
pub const STAFF: DbId = 20;
pub const LANDLORD: DbId = 500;
pub const OTHER_LANDLORD: DbId = 501;
pub const TENANT: DbId = 700;
pub const OTHER_TENANT: DbId = 701;

/// Server configuration for tests. The pool comes from `#[sqlx::test]`, so
/// `database_url` is never dialled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-propdesk".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The production router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A bearer token for `user_id` acting as `role`.
pub fn token(user_id: DbId, role: Role) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin() -> String {
    token(ADMIN, Role::Admin)
}

pub fn staff() -> String {
    token(STAFF, Role::Staff)
}

pub fn tenant() -> String {
    token(TENANT, Role::Tenant)
}

pub fn landlord() -> String {
    token(LANDLORD, Role::Landlord)
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST and return `data` from the envelope, asserting the status.
pub async fn post_data(
    pool: &PgPool,
    uri: &str,
    token: &str,
    body: serde_json::Value,
    expected: axum::http::StatusCode,
) -> serde_json::Value {
    let response = post_json_auth(build_test_app(pool.clone()), uri, token, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "POST {uri} returned {json}");
    json["data"].clone()
}

/// Property owned by [`LANDLORD`], created through the API.
pub async fn property(pool: &PgPool) -> DbId {
    let data = post_data(
        pool,
        "/api/v1/properties",
        &admin(),
        serde_json::json!({ "landlord_id": LANDLORD, "name": "12 Harbour Road" }),
        axum::http::StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

/// Monthly lease for [`TENANT`] starting 2026-01-01.
pub async fn lease(pool: &PgPool, property_id: DbId, rent: &str) -> DbId {
    let data = post_data(
        pool,
        "/api/v1/leases",
        &admin(),
        serde_json::json!({
            "tenant_id": TENANT,
            "property_id": property_id,
            "rent_amount": rent,
            "start_date": "2026-01-01",
            "service_charge": "600",
            "caution_deposit": "2000",
        }),
        axum::http::StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

/// October 2026 cycle for [`LANDLORD`].
pub async fn october_cycle(pool: &PgPool) -> DbId {
    let data = post_data(
        pool,
        "/api/v1/rent-cycles",
        &admin(),
        serde_json::json!({
            "landlord_id": LANDLORD,
            "start_date": "2026-10-01",
            "end_date": "2026-10-31",
        }),
        axum::http::StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}
