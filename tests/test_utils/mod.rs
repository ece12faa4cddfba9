//! Test utilities for API and database testing.
//!
//! This module provides helpers for setting up in-memory SQLite databases with
//! migrations applied and for building the application router with a known
//! test token.

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use vendor_registry::{config::AppConfig, server};

/// Bearer token accepted by the test application.
pub const TEST_TOKEN: &str = "test-token";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Builds the application router backed by a fresh in-memory database.
pub async fn setup_test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let config = AppConfig {
        profile: "test".to_string(),
        api_tokens: vec![TEST_TOKEN.to_string()],
        ..Default::default()
    };

    let state = server::create_test_app_state(config, db.clone());
    Ok((server::create_app(state), db))
}

/// Builds an authenticated request for the given owner.
pub fn authed_request(method: &str, uri: &str, owner: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TEST_TOKEN))
        .header("X-Owner-Id", owner);

    match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends one request through the router and returns the response.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Reads a response body as JSON.
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid create/update payload for tests.
#[allow(dead_code)]
pub fn vendor_payload(name: &str, account: &str) -> Value {
    serde_json::json!({
        "vendorName": name,
        "bankAccountNo": account,
        "bankName": "X Bank",
        "addressLine2": "Line2"
    })
}
