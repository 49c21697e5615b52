//! # Fiet
//!
//! A small user-account REST service: registration, login with Argon2id
//! password hashing and JWT issuance, and JWT-protected profile management.
//!
//! ## Overview
//!
//! Fiet can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `fiet-server` binary
//! 2. **As a library** - Mount [`api::routes::create_router`] in your own Axum app
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use fiet::{db::DatabaseProvider, utils::config::Config, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = DatabaseProvider::Memory.create_client().await?;
//!     let app = fiet::api::routes::create_router(AppState::new(config, Arc::new(db)));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Token service, auth gate and password hashing
//! - [`db`] - User storage (libsql)
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - Configuration
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `turso` | Remote Turso database |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// User storage.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::jwt::TokenService;
pub use db::{TursoClient, UserStore};
pub use types::{AppError, Result};
pub use utils::config::Config;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<Config>,
    /// User store
    pub db: Arc<dyn UserStore>,
    /// Token issuance and validation
    pub token_service: Arc<TokenService>,
}

impl AppState {
    /// Builds the state, keying the token service with `config.auth.jwt_secret`.
    pub fn new(config: Config, db: Arc<dyn UserStore>) -> Self {
        let token_service = TokenService::new(&config.auth.jwt_secret);

        Self {
            config: Arc::new(config),
            db,
            token_service: Arc::new(token_service),
        }
    }
}
