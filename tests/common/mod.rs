//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use fiet::{api::routes::create_router, db::TursoClient, utils::config::Config, AppState};
use serde_json::json;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_SECRET.as_bytes().to_vec();
    config
}

/// App state backed by a fresh in-memory database
pub async fn create_test_state() -> AppState {
    let db = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");

    AppState::new(test_config(), Arc::new(db))
}

pub async fn create_test_server() -> TestServer {
    server_for(create_test_state().await)
}

pub fn server_for(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
}

pub async fn register(server: &TestServer, email: &str, password: &str) {
    server
        .post("/api/v1/register")
        .json(&json!({ "email": email, "password": password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

/// Logs in and returns the bearer token from the response body
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/login")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

pub async fn register_and_login(server: &TestServer, email: &str, password: &str) -> String {
    register(server, email, password).await;
    login(server, email, password).await
}
