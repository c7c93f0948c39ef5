#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use recipe_service::config::RecipeConfig;
use recipe_service::services::ChatCompletionProvider;
use recipe_service::startup::{build_router, AppState};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const APP_JS: &str = "console.log('recipe app');";

/// Configuration with defaults, pointing the front-end at `dist_dir`.
pub fn test_config(dist_dir: &Path, overrides: &[(&str, &str)]) -> RecipeConfig {
    let dist = dist_dir.to_string_lossy().to_string();
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    RecipeConfig::from_lookup(CoreConfig { port: 0 }, |key| {
        if key == "FRONTEND_DIST_DIR" {
            return Some(dist.clone());
        }
        overrides
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("Failed to build test config")
}

/// Write a minimal front-end bundle into a fresh temp directory.
pub fn temp_dist_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("recipe-dist-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("assets")).expect("Failed to create dist dir");
    std::fs::write(dir.join("index.html"), INDEX_HTML).expect("Failed to write index.html");
    std::fs::write(dir.join("assets").join("app.js"), APP_JS).expect("Failed to write app.js");
    dir
}

pub fn test_app(provider: Arc<dyn ChatCompletionProvider>) -> Router {
    test_app_with(provider, &[])
}

pub fn test_app_with(
    provider: Arc<dyn ChatCompletionProvider>,
    overrides: &[(&str, &str)],
) -> Router {
    let config = test_config(&temp_dist_dir(), overrides);
    build_router(AppState::new(config, provider))
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn post_raw(app: Router, body: &str, content_type: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/get-recipe")
                .header("content-type", content_type)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = body_bytes(response).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_recipe(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string(), "application/json").await
}

pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}
