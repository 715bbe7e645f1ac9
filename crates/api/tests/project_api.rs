//! HTTP-level integration tests for the project endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_returns_201(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/projects",
        serde_json::json!({"name": "  Emma's 5th  ", "description": "Unicorns"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Emma's 5th");
    assert_eq!(json["description"], "Unicorns");
    assert!(json["id"].is_number());
    assert!(json["createdAt"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_without_name_returns_400(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", serde_json::json!({"name": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_with_long_name_returns_400(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/projects",
        serde_json::json!({"name": "x".repeat(101)}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_project_includes_iterations(pool: SqlitePool) {
    let id = common::create_project(&pool, "Pirates").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/projects/{id}/iterations"),
        serde_json::json!({
            "theme": "Pirate cove",
            "decorationTypes": ["Banner"],
            "images": [{"decorationType": "Banner", "image": "data:image/png;base64,QQ=="}]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Pirates");
    assert_eq!(json["iterations"].as_array().unwrap().len(), 1);
    assert_eq!(json["iterations"][0]["theme"], "Pirate cove");
    assert_eq!(
        json["iterations"][0]["images"][0]["imageUrl"],
        "data:image/png;base64,QQ=="
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 999999 not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_projects_newest_first(pool: SqlitePool) {
    common::create_project(&pool, "First").await;
    common::create_project(&pool, "Second").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/projects").await).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project(pool: SqlitePool) {
    let id = common::create_project(&pool, "Original").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        serde_json::json!({"name": "Updated"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Updated");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project_rejects_blank_name(pool: SqlitePool) {
    let id = common::create_project(&pool, "Original").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        serde_json::json!({"name": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project_rejects_long_description(pool: SqlitePool) {
    let id = common::create_project(&pool, "Original").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        serde_json::json!({"description": "x".repeat(1001)}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/projects/{id}")).await).await;
    assert!(json["description"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_nonexistent_project_returns_404(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = put_json(app, "/api/projects/4242", serde_json::json!({"name": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_project_returns_204_then_404(pool: SqlitePool) {
    let id = common::create_project(&pool, "Doomed").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
