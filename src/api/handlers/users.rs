use crate::{
    auth::{
        middleware::AuthUser,
        password::{hash_password, verify_password},
    },
    db::update::allowed_updates,
    types::{
        AppError, ChangePasswordRequest, ErrorResponse, MessageResponse, PublicUser, Result,
        UpdateUserRequest,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{Map, Value};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = [PublicUser]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("BearerAuth" = [])),
    tag = "user"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<PublicUser>>> {
    Ok(Json(state.db.list_users().await?))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "Caller's profile", body = PublicUser),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("BearerAuth" = [])),
    tag = "user"
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<PublicUser>> {
    state
        .db
        .get_user_by_uuid(&user.user_uuid)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}

/// Update the caller's profile
///
/// Only `name`, `age` and `email` are applied; other keys are ignored.
#[utoipa::path(
    patch,
    path = "/api/v1/user",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = MessageResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("BearerAuth" = [])),
    tag = "user"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(fields) = payload?;
    let updates = allowed_updates(&fields)?;

    if !state.db.update_user(&user.user_uuid, &updates).await? {
        return Err(user_not_found());
    }

    tracing::info!(
        user_uuid = %user.user_uuid,
        fields = ?updates.iter().map(|u| u.column).collect::<Vec<_>>(),
        "user updated"
    );

    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("BearerAuth" = [])),
    tag = "user"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_user(&user.user_uuid).await? {
        return Err(user_not_found());
    }

    tracing::info!(user_uuid = %user.user_uuid, "user deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/v1/user/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Incorrect current password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("BearerAuth" = [])),
    tag = "user"
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: std::result::Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(payload) = payload?;

    if payload.new_password.is_empty() {
        return Err(AppError::InvalidInput(
            "New password is required".to_string(),
        ));
    }

    let stored_hash = state
        .db
        .get_password_hash(&user.user_uuid)
        .await?
        .ok_or_else(user_not_found)?;

    if !verify_password(&payload.current_password, &stored_hash)? {
        return Err(AppError::Auth("Incorrect current password".to_string()));
    }

    let new_hash = hash_password(&payload.new_password)?;

    if !state.db.update_password(&user.user_uuid, &new_hash).await? {
        return Err(user_not_found());
    }

    tracing::info!(user_uuid = %user.user_uuid, "password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
