//! Database abstraction traits
//!
//! This module provides the `UserStore` trait that abstracts over different
//! database backends (in-memory SQLite, file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use fiet::db::DatabaseProvider;
//!
//! // Use in-memory database (default for tests)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "fiet.db".into() }.create_client().await?;
//! ```

use super::update::FieldUpdate;
use crate::types::{PublicUser, Result};
use async_trait::async_trait;

/// Database provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<super::turso::TursoClient> {
        match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }

    /// Short label for logs; never includes credentials.
    pub fn describe(&self) -> String {
        match self {
            DatabaseProvider::Memory => "in-memory".to_string(),
            DatabaseProvider::SQLite { path } => format!("sqlite:{}", path),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => format!("turso:{}", url),
        }
    }
}

/// What login needs to check a password and mint a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub uuid: String,
    pub password_hash: String,
}

/// Storage operations behind the user-account routes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email surfaces as `AppError::Conflict`.
    async fn create_user(&self, uuid: &str, email: &str, password_hash: &str) -> Result<()>;

    /// Whether any user is registered under `email`
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Look up login credentials by email
    async fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Get a user's public profile
    async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<PublicUser>>;

    /// List every user, oldest first
    async fn list_users(&self) -> Result<Vec<PublicUser>>;

    /// Apply an allow-listed partial update; `false` when no such user
    async fn update_user(&self, uuid: &str, updates: &[FieldUpdate]) -> Result<bool>;

    /// Get the stored password hash for a user
    async fn get_password_hash(&self, uuid: &str) -> Result<Option<String>>;

    /// Replace a user's password hash; `false` when no such user
    async fn update_password(&self, uuid: &str, password_hash: &str) -> Result<bool>;

    /// Delete a user; `false` when no such user
    async fn delete_user(&self, uuid: &str) -> Result<bool>;
}
