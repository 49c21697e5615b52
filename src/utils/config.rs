use crate::db::DatabaseProvider;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Domain attribute of the `token` cookie set at login
    pub cookie_domain: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cookie_domain: "localhost".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub provider: DatabaseProvider,
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

/// In-memory by default. [`Config::from_lookup`] falls back to `fiet.db`
/// instead when `DATABASE_PATH` is unset.
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::Memory,
            connect_retries: 10,
            retry_delay: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Raw bytes of the HMAC signing key. May be empty.
    pub jwt_secret: Vec<u8>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &format_args!("<{} bytes>", self.jwt_secret.len()))
            .finish()
    }
}

/// Loads `path` into the process environment. Existing variables win.
///
/// Returns `false` when the file could not be read.
pub fn load_env_file(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        // `env::var` drops non-UTF-8 values; the key is read as raw bytes.
        config.auth.jwt_secret = secret_bytes(env::var_os("JWT_SECRET"))?;
        Ok(config)
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "PORT", defaults.server.port)?,
                log_level: lookup("LOG_LEVEL").unwrap_or(defaults.server.log_level),
                log_format: parse_or(&lookup, "LOG_FORMAT", defaults.server.log_format)?,
                cookie_domain: lookup("COOKIE_DOMAIN").unwrap_or(defaults.server.cookie_domain),
            },
            database: DatabaseConfig {
                provider: database_provider(&lookup),
                connect_retries: parse_or(
                    &lookup,
                    "DB_CONNECT_RETRIES",
                    defaults.database.connect_retries,
                )?,
                retry_delay: Duration::from_secs(parse_or(
                    &lookup,
                    "DB_RETRY_DELAY_SECS",
                    defaults.database.retry_delay.as_secs(),
                )?),
            },
            auth: AuthConfig {
                jwt_secret: lookup("JWT_SECRET")
                    .map(String::into_bytes)
                    .unwrap_or_default(),
            },
        })
    }
}

fn secret_bytes(value: Option<OsString>) -> Result<Vec<u8>, ConfigError> {
    value.map(os_bytes).transpose().map(Option::unwrap_or_default)
}

#[cfg(unix)]
fn os_bytes(value: OsString) -> Result<Vec<u8>, ConfigError> {
    use std::os::unix::ffi::OsStringExt;
    Ok(value.into_vec())
}

#[cfg(not(unix))]
fn os_bytes(value: OsString) -> Result<Vec<u8>, ConfigError> {
    value
        .into_string()
        .map(String::into_bytes)
        .map_err(|raw| ConfigError::InvalidValue {
            key: "JWT_SECRET",
            value: raw.to_string_lossy().into_owned(),
        })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn database_provider<F>(lookup: &F) -> DatabaseProvider
where
    F: Fn(&str) -> Option<String>,
{
    // Check for Turso configuration first
    #[cfg(feature = "turso")]
    {
        if let (Some(url), Some(auth_token)) =
            (lookup("TURSO_DATABASE_URL"), lookup("TURSO_AUTH_TOKEN"))
        {
            if !url.is_empty() && !auth_token.is_empty() {
                return DatabaseProvider::Turso { url, auth_token };
            }
        }
    }

    match lookup("DATABASE_PATH") {
        Some(path) if path == ":memory:" => DatabaseProvider::Memory,
        Some(path) if !path.is_empty() => DatabaseProvider::SQLite { path },
        _ => DatabaseProvider::SQLite {
            path: "fiet.db".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults parse");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.server.cookie_domain, "localhost");
        assert_eq!(config.database.connect_retries, 10);
        assert_eq!(config.database.retry_delay, Duration::from_secs(10));
        assert_eq!(
            config.database.provider,
            DatabaseProvider::SQLite {
                path: "fiet.db".to_string()
            }
        );
        assert!(config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("LOG_FORMAT", "JSON"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_PATH", ":memory:"),
            ("DB_CONNECT_RETRIES", "2"),
            ("DB_RETRY_DELAY_SECS", "0"),
        ])
        .expect("valid config");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.auth.jwt_secret, b"s3cret");
        assert_eq!(config.database.provider, DatabaseProvider::Memory);
        assert_eq!(config.database.connect_retries, 2);
        assert_eq!(config.database.retry_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_port_names_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).expect_err("port must be numeric");
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_invalid_log_format() {
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = config_from(&[("JWT_SECRET", "do-not-print")]).expect("valid config");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("do-not-print"));
    }

    #[test]
    fn test_missing_secret_is_empty() {
        assert_eq!(secret_bytes(None).unwrap(), Vec::<u8>::new());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_secret_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"k\xffey".to_vec());
        assert_eq!(secret_bytes(Some(raw)).unwrap(), b"k\xffey");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_reads_non_utf8_secret() {
        use std::os::unix::ffi::OsStrExt;

        env::set_var("JWT_SECRET", std::ffi::OsStr::from_bytes(b"k\xffey"));
        let config = Config::from_env();
        env::remove_var("JWT_SECRET");

        assert_eq!(config.expect("valid config").auth.jwt_secret, b"k\xffey");
    }
}
