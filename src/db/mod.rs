//! User storage.
//!
//! - **Turso/SQLite** via libsql: in-memory, local file, or remote Turso
//!   (`turso` feature).
//! - [`traits::UserStore`] is the seam the HTTP handlers depend on.
//! - [`update`] turns untrusted `PATCH` bodies into allow-listed column updates.

pub mod traits;
pub mod turso;
pub mod update;

use crate::types::Result;
use std::time::Duration;

pub use traits::{DatabaseProvider, UserCredentials, UserStore};
pub use turso::TursoClient;

/// Opens `provider`, retrying up to `attempts` times with `delay` in between.
///
/// The last error is returned when every attempt fails.
pub async fn connect_with_retry(
    provider: &DatabaseProvider,
    attempts: u32,
    delay: Duration,
) -> Result<TursoClient> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match provider.create_client().await {
            Ok(client) => {
                tracing::info!(database = %provider.describe(), "connected to database");
                return Ok(client);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    error = %e,
                    attempt,
                    attempts,
                    "database connection failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_first_try() {
        let client = connect_with_retry(&DatabaseProvider::Memory, 3, Duration::from_millis(1))
            .await
            .expect("in-memory database always opens");

        assert!(client.list_users().await.expect("empty table").is_empty());
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_attempts() {
        let provider = DatabaseProvider::SQLite {
            path: "/nonexistent-dir/fiet/test.db".to_string(),
        };

        let result = connect_with_retry(&provider, 2, Duration::from_millis(1)).await;
        assert!(result.is_err());
    }
}
