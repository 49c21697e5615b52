use crate::{
    auth::password::{hash_password, verify_password},
    db::update::is_valid_email,
    types::{
        AppError, ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
        Result,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use uuid::Uuid;

/// Lifetime of the `token` cookie set at login, in seconds.
pub const LOGIN_COOKIE_MAX_AGE: u64 = 3600;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "user"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let Json(payload) = payload?;

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }

    if state.db.email_exists(&payload.email).await? {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user_uuid = Uuid::new_v4().to_string();
    state
        .db
        .create_user(&user_uuid, &payload.email, &password_hash)
        .await?;

    tracing::info!(%user_uuid, "user registered");

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created"))))
}

/// Login with email and password
///
/// The token is returned in the body and as the `token` cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "user"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<([(HeaderName, String); 1], Json<LoginResponse>)> {
    let Json(payload) = payload?;

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidPayload(
            "email and password are required".to_string(),
        ));
    }

    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidPayload(
            "email must be a valid address".to_string(),
        ));
    }

    let credentials = state
        .db
        .get_credentials_by_email(&payload.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&payload.password, &credentials.password_hash)? {
        tracing::debug!(user_uuid = %credentials.uuid, "login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let token = state.token_service.issue(&credentials.uuid).map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        AppError::Internal("Token generation failed".to_string())
    })?;

    let cookie = format!(
        "token={}; Max-Age={}; Path=/; Domain={}",
        token, LOGIN_COOKIE_MAX_AGE, state.config.server.cookie_domain
    );

    tracing::info!(user_uuid = %credentials.uuid, "user logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    ))
}

fn invalid_credentials() -> AppError {
    AppError::Auth("Invalid email or password".to_string())
}
