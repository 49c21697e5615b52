use super::traits::{UserCredentials, UserStore};
use super::update::{update_statement, FieldUpdate, FieldValue};
use crate::types::{AppError, PublicUser, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};
use std::time::Duration;

const PUBLIC_USER_COLUMNS: &str = "uuid, name, email, age, created_at, updated_at";

const MEMORY_PATH: &str = ":memory:";

/// libsql-backed user store.
///
/// File and remote databases get a fresh connection per operation, so the
/// affected-row count of one request never leaks into another. An in-memory
/// database only exists as long as its connection, so it keeps one.
pub struct TursoClient {
    db: Database,
    shared: Option<Connection>,
    busy_timeout: Option<Duration>,
}

/// How long a local writer waits on a locked database file.
const LOCAL_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl TursoClient {
    /// Opens an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(MEMORY_PATH).await
    }

    /// Opens (or creates) a SQLite database file. `:memory:` opens an
    /// in-memory database.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        let shared = if path == MEMORY_PATH {
            Some(connect(&db)?)
        } else {
            None
        };

        Self::init(Self {
            db,
            shared,
            busy_timeout: Some(LOCAL_BUSY_TIMEOUT),
        })
        .await
    }

    /// Connects to a remote Turso database.
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::init(Self {
            db,
            shared: None,
            busy_timeout: None,
        })
        .await
    }

    async fn init(client: Self) -> Result<Self> {
        client.initialize_schema().await?;
        Ok(client)
    }

    fn connection(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        let conn = connect(&self.db)?;
        if let Some(timeout) = self.busy_timeout {
            conn.busy_timeout(timeout)
                .map_err(|e| AppError::Database(format!("Failed to set busy timeout: {}", e)))?;
        }

        Ok(conn)
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                uuid TEXT UNIQUE NOT NULL,
                name TEXT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                age INTEGER,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

fn timestamp(row: &Row, idx: i32) -> Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx).map_err(|e| AppError::Database(e.to_string()))?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Timestamp out of range: {}", secs)))
}

fn public_user(row: &Row) -> Result<PublicUser> {
    Ok(PublicUser {
        uuid: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        age: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
    })
}

impl From<&FieldValue> for libsql::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => libsql::Value::Text(s.clone()),
            FieldValue::Integer(n) => libsql::Value::Integer(*n),
            FieldValue::Null => libsql::Value::Null,
        }
    }
}

#[async_trait]
impl UserStore for TursoClient {
    async fn create_user(&self, uuid: &str, email: &str, password_hash: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (uuid, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (uuid, email, password_hash, now, now),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User already exists".to_string())
            } else {
                AppError::Database(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT 1 FROM users WHERE email = ?", [email])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    async fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT uuid, password_hash FROM users WHERE email = ?",
                [email],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(UserCredentials {
                uuid: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<PublicUser>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE uuid = ?", PUBLIC_USER_COLUMNS),
                [uuid],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(public_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<PublicUser>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users ORDER BY id ASC", PUBLIC_USER_COLUMNS),
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(public_user(&row)?);
        }

        Ok(users)
    }

    async fn update_user(&self, uuid: &str, updates: &[FieldUpdate]) -> Result<bool> {
        let conn = self.connection()?;
        let sql = update_statement(updates);

        let mut params: Vec<libsql::Value> = updates.iter().map(|u| (&u.value).into()).collect();
        params.push(libsql::Value::Integer(Utc::now().timestamp()));
        params.push(libsql::Value::Text(uuid.to_string()));

        let affected = conn
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Email already in use".to_string())
                } else {
                    AppError::Database(format!("Failed to update user: {}", e))
                }
            })?;

        Ok(affected > 0)
    }

    async fn get_password_hash(&self, uuid: &str) -> Result<Option<String>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT password_hash FROM users WHERE uuid = ?", [uuid])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(
                row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    async fn update_password(&self, uuid: &str, password_hash: &str) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE users SET password_hash = ?, updated_at = ? WHERE uuid = ?",
                (password_hash, now, uuid),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update password: {}", e)))?;

        Ok(affected > 0)
    }

    async fn delete_user(&self, uuid: &str) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute("DELETE FROM users WHERE uuid = ?", [uuid])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(affected > 0)
    }
}

fn connect(db: &Database) -> Result<Connection> {
    db.connect()
        .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
}
