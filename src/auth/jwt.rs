use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Source of "now" for issuing and validating tokens.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Claims carried by Fiet tokens.
///
/// `user_uuid` is optional on the decode side: a correctly signed token without
/// a string subject still decodes, so the auth gate can report it separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_uuid: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Builds the claim set for `user_uuid` issued at `now`.
    pub fn new(user_uuid: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            user_uuid: Some(user_uuid.to_string()),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iat: Some(iat),
            nbf: Some(iat),
        }
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing primitive failed. Points at a broken key or crypto setup.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, wrong algorithm, malformed, expired or not yet valid.
    #[error("invalid or expired token")]
    InvalidOrExpired,
}

/// Issues and validates HMAC-signed bearer tokens.
///
/// Holds the shared secret for the lifetime of the process. Nothing in here is
/// mutated after construction, so one instance is shared across requests.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service keyed by `secret`, reading time from the system clock.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Creates a service keyed by `secret` with an explicit clock.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Time checks run against `clock` in `validate`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Issues an HS256 token for `user_uuid`, valid for [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_uuid: &str) -> Result<String, TokenError> {
        let claims = Claims::new(user_uuid, self.clock.now());

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies signature, algorithm family and time window of `token`.
    ///
    /// Every failure collapses into [`TokenError::InvalidOrExpired`]; the
    /// underlying reason is only logged.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "token rejected");
                TokenError::InvalidOrExpired
            })?;

        let now = self.clock.now().timestamp();

        if let Some(nbf) = claims.nbf {
            if now < nbf {
                tracing::debug!(nbf, now, "token rejected: not yet valid");
                return Err(TokenError::InvalidOrExpired);
            }
        }

        if now >= claims.exp {
            tracing::debug!(exp = claims.exp, now, "token rejected: expired");
            return Err(TokenError::InvalidOrExpired);
        }

        Ok(claims)
    }
}
