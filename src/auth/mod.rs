//! JWT Authentication and Middleware
//!
//! This module provides the authentication core of Fiet: issuing and
//! validating bearer tokens, hashing passwords, and gating protected routes.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - token issuance/validation and claims
//! - [`auth::middleware`](crate::auth::middleware) - the Axum auth gate and the `AuthUser` extractor
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing
//!
//! # Token Contract
//!
//! Tokens are HS256-signed JWTs carrying `user_uuid`, `iat`, `nbf` and `exp`
//! (`exp = iat + 24h`). Validation accepts only the HMAC family and reports
//! every failure the same way.
//!
//! # Usage
//!
//! ```ignore
//! use fiet::auth::jwt::TokenService;
//!
//! let tokens = TokenService::new(&config.auth.jwt_secret);
//! let token = tokens.issue(&user_uuid)?;
//! let claims = tokens.validate(&token)?;
//! ```
//!
//! ## Middleware
//!
//! ```ignore
//! use axum::middleware;
//! use fiet::auth::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/user", get(handler))
//!     .route_layer(middleware::from_fn_with_state(tokens.clone(), auth_middleware));
//! ```
//!
//! ## Extracting the Caller in Handlers
//!
//! ```ignore
//! async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.user_uuid)
//! }
//! ```

/// Token issuance and validation.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
