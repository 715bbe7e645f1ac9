#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use festoon_imagegen::api::ImageGenError;
use festoon_imagegen::generator::Generator;
use festoon_imagegen::provider::{ImageProvider, ImageRequest};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use festoon_api::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use festoon_api::router::build_app_router;
use festoon_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        database_url: "sqlite::memory:".to_string(),
    }
}

/// Build the full application router around `provider`.
///
/// Uses [`build_app_router`] so tests exercise the production middleware
/// stack.
pub fn build_app_with_provider(pool: SqlitePool, provider: Arc<dyn ImageProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator: Generator::new(provider),
    };
    build_app_router(state, &config)
}

/// Build the application with a [`FakeProvider`].
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_app_with_provider(pool, Arc::new(FakeProvider))
}

// ---------------------------------------------------------------------------
// Fake image provider
// ---------------------------------------------------------------------------

/// Answers every prompt with a tiny data URL.
///
/// Prompts for a party banner fail, and prompts for a cake topper finish
/// last, so tests can observe partial failures and completion order.
pub struct FakeProvider;

#[async_trait]
impl ImageProvider for FakeProvider {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, ImageGenError> {
        if request.prompt.contains("party banner") {
            return Err(ImageGenError::ApiError {
                status: 502,
                body: "upstream exploded".to_string(),
            });
        }
        if request.prompt.contains("cake topper") {
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        Ok(format!("data:image/png;base64,{}", request.size.as_str().len()))
    }
}

/// Fails every request.
pub struct FailingProvider;

#[async_trait]
impl ImageProvider for FailingProvider {
    async fn generate_image(&self, _request: &ImageRequest) -> Result<String, ImageGenError> {
        Err(ImageGenError::NoImage)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, json).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, json).await
}

async fn json_request(app: Router, method: Method, uri: &str, json: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a project through the API and return its id.
pub async fn create_project(pool: &SqlitePool, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/projects", serde_json::json!({ "name": name })).await;
    body_json(response).await["id"].as_i64().unwrap()
}
