//! Handler error mapping with a mocked `UserStore`.

mod common;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum_test::TestServer;
use common::{bearer, server_for, test_config};
use fiet::{
    db::{update::FieldUpdate, UserCredentials, UserStore},
    types::PublicUser,
    AppError, AppState, Result,
};
use mockall::mock;
use serde_json::json;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl UserStore for Store {
        async fn create_user(&self, uuid: &str, email: &str, password_hash: &str) -> Result<()>;
        async fn email_exists(&self, email: &str) -> Result<bool>;
        async fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
        async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<PublicUser>>;
        async fn list_users(&self) -> Result<Vec<PublicUser>>;
        async fn update_user(&self, uuid: &str, updates: &[FieldUpdate]) -> Result<bool>;
        async fn get_password_hash(&self, uuid: &str) -> Result<Option<String>>;
        async fn update_password(&self, uuid: &str, password_hash: &str) -> Result<bool>;
        async fn delete_user(&self, uuid: &str) -> Result<bool>;
    }
}

/// Server over `store` plus a valid token for subject `u-123`
fn server_with(store: MockStore) -> (TestServer, String) {
    let state = AppState::new(test_config(), Arc::new(store));
    let token = state.token_service.issue("u-123").expect("signing succeeds");
    (server_for(state), token)
}

#[tokio::test]
async fn test_database_failure_is_opaque() {
    let mut store = MockStore::new();
    store
        .expect_list_users()
        .returning(|| Err(AppError::Database("disk I/O error at /var/lib/fiet.db".to_string())));
    let (server, token) = server_with(store);

    let response = server
        .get("/api/v1/users")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_login_database_failure() {
    let mut store = MockStore::new();
    store
        .expect_get_credentials_by_email()
        .returning(|_| Err(AppError::Database("connection reset".to_string())));
    let (server, _) = server_with(store);

    let response = server
        .post("/api/v1/login")
        .json(&json!({ "email": "ada@example.com", "password": "password123" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_malformed_login_never_reaches_store() {
    let mut store = MockStore::new();
    store.expect_get_credentials_by_email().never();
    let (server, _) = server_with(store);

    server
        .post("/api/v1/login")
        .json(&json!({ "email": "not-an-email", "password": "password123" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_register_race_on_unique_email() {
    let mut store = MockStore::new();
    store.expect_email_exists().returning(|_| Ok(false));
    store
        .expect_create_user()
        .times(1)
        .returning(|_, _, _| Err(AppError::Conflict("User already exists".to_string())));
    let (server, _) = server_with(store);

    let response = server
        .post("/api/v1/register")
        .json(&json!({ "email": "ada@example.com", "password": "password123" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    response.assert_json(&json!({ "error": "User already exists" }));
}

#[tokio::test]
async fn test_profile_of_vanished_user() {
    let mut store = MockStore::new();
    store
        .expect_get_user_by_uuid()
        .withf(|uuid| uuid.to_string() == "u-123")
        .returning(|_| Ok(None));
    let (server, token) = server_with(store);

    let response = server
        .get("/api/v1/user")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_update_of_vanished_user() {
    let mut store = MockStore::new();
    store
        .expect_update_user()
        .withf(|uuid, updates| {
            uuid.to_string() == "u-123" && updates.len() == 1 && updates[0].column == "name"
        })
        .returning(|_, _| Ok(false));
    let (server, token) = server_with(store);

    let response = server
        .patch("/api/v1/user")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "name": "Ada" }))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_rejected_update_never_reaches_store() {
    let mut store = MockStore::new();
    store.expect_update_user().never();
    let (server, token) = server_with(store);

    let response = server
        .patch("/api/v1/user")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "password_hash": "x" }))
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "No valid fields to update" }));
}

#[tokio::test]
async fn test_change_password_for_vanished_user() {
    let mut store = MockStore::new();
    store.expect_get_password_hash().returning(|_| Ok(None));
    store.expect_update_password().never();
    let (server, token) = server_with(store);

    let response = server
        .put("/api/v1/user/password")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "current_password": "a", "new_password": "b" }))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "User not found" }));
}
