use crate::auth::jwt::TokenService;
use crate::types::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const MISSING_TOKEN: &str = "Authorization token required";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const MISSING_SUBJECT: &str = "Missing user_uuid in token";

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to a request once the auth gate lets it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_uuid: String,
}

/// Rejects requests without a currently valid bearer token.
///
/// On success the caller's [`AuthenticatedUser`] is inserted into the request
/// extensions and the request continues down the stack.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token =
        bearer_token(req.headers()).ok_or_else(|| AppError::Auth(MISSING_TOKEN.to_string()))?;

    // A non-UTF-8 token can never be a valid JWT.
    let claims = std::str::from_utf8(token)
        .ok()
        .and_then(|token| tokens.validate(token).ok())
        .ok_or_else(|| AppError::Auth(INVALID_TOKEN.to_string()))?;

    let user_uuid = claims
        .user_uuid
        .ok_or_else(|| AppError::Auth(MISSING_SUBJECT.to_string()))?;

    tracing::debug!(%user_uuid, "request authenticated");
    req.extensions_mut().insert(AuthenticatedUser { user_uuid });

    Ok(next.run(req).await)
}

/// Raw bytes after `Bearer `, or `None` when the header is absent or uses
/// another scheme.
fn bearer_token(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.as_bytes().strip_prefix(BEARER_PREFIX.as_bytes()))
}

/// Extractor for the identity set by [`auth_middleware`].
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth("User UUID not found in token".to_string()))
    }
}
