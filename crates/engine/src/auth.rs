//! Password hashing and bearer token signing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Internal(format!("password hashing failed: {err}")))
}

pub(crate) fn verify_password(password: &str, stored: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| EngineError::Internal(format!("stored password hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Run the CPU-heavy hash on the blocking pool.
pub(crate) async fn hash_password_blocking(password: String) -> ResultEngine<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| EngineError::Internal(format!("password hashing task failed: {err}")))?
}

pub(crate) async fn verify_password_blocking(password: String, stored: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|err| EngineError::Internal(format!("password verification task failed: {err}")))?
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub user_name: String,
    /// Unique per issued token, so two logins in the same second differ.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer for bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> ResultEngine<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| EngineError::InvalidInput("token lifetime is out of range".to_string()))
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> ResultEngine<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(EngineError::InvalidInput(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if ttl <= Duration::zero() {
            return Err(EngineError::InvalidInput(
                "token lifetime must be positive".to_string(),
            ));
        }
        expiry_after(Utc::now(), ttl)?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn issue(&self, user_id: i32, user_name: &str) -> ResultEngine<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            user_name: user_name.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry_after(now, self.ttl)?.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| EngineError::Internal(format!("token signing failed: {err}")))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> ResultEngine<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    EngineError::Unauthorized("token expired".to_string())
                }
                _ => EngineError::Unauthorized("invalid token".to_string()),
            })
    }
}
