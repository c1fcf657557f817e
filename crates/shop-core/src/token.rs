//! # Bearer Tokens
//!
//! Stateless credentials handed out at login and presented on every
//! protected request. There is no server-side token store, so a token stays
//! valid until its TTL runs out.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            TokenService (trait)             │
//! │  ├── issue_at(user_id, username, now)       │
//! │  └── verify_at(token, now)                  │
//! └─────────────────────────────────────────────┘
//!                ▲                    ▲
//!   ┌────────────┴───────────┐ ┌──────┴──────────────┐
//!   │ SharedSecretTokenService│ │ SignedTokenService  │
//!   │  base64(JSON + secret)  │ │ payload.HMAC-SHA256 │
//!   └─────────────────────────┘ └─────────────────────┘
//! ```
//!
//! `SharedSecretTokenService` is the default. Its payload is only encoded,
//! not encrypted: anyone holding a token can read the fields, including the
//! shared secret, and anyone who knows the secret can forge tokens.
//! `SignedTokenService` is available behind the same trait and is only used
//! when selected explicitly in configuration.

use base64::{engine::general_purpose, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Longest accepted token lifetime: 10 years
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 86_400;

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Result of issuing a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Unix seconds
    pub issued_at: i64,
    /// Unix seconds, `issued_at + ttl`
    pub expires_at: i64,
}

/// Why a token was refused. Callers treat every variant as "invalid".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not decodable")]
    Undecodable,

    #[error("token is missing field `{0}`")]
    MissingField(&'static str),

    #[error("token secret or signature mismatch")]
    BadSecret,

    #[error("token expired")]
    Expired,
}

/// Issues and verifies bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token as of `now` (unix seconds)
    fn issue_at(&self, user_id: i64, username: &str, now: i64) -> IssuedToken;

    /// Verify a token as of `now` (unix seconds)
    fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError>;

    /// Scheme name, for logging
    fn scheme(&self) -> &'static str;

    fn issue(&self, user_id: i64, username: &str) -> IssuedToken {
        self.issue_at(user_id, username, Utc::now().timestamp())
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }
}

/// Type alias for a shared token service (dynamic dispatch)
pub type BoxedTokenService = Arc<dyn TokenService>;

/// Decoded token body; every field optional so absence can be reported
#[derive(Debug, Deserialize)]
struct RawPayload {
    user_id: Option<i64>,
    username: Option<String>,
    timestamp: Option<i64>,
    secret: Option<String>,
}

impl RawPayload {
    fn decode(bytes: &[u8]) -> Result<Self, TokenError> {
        serde_json::from_slice(bytes).map_err(|_| TokenError::Undecodable)
    }

    /// Fields and expiry only; the caller has already authenticated the payload
    fn identity(self, ttl_secs: i64, now: i64) -> Result<Identity, TokenError> {
        let user_id = self.user_id.ok_or(TokenError::MissingField("user_id"))?;
        let username = self.username.ok_or(TokenError::MissingField("username"))?;
        let issued_at = self.timestamp.ok_or(TokenError::MissingField("timestamp"))?;

        // Age must be in 0..=ttl; the timestamp is client-supplied
        match now.checked_sub(issued_at) {
            Some(age) if (0..=ttl_secs).contains(&age) => Ok(Identity { user_id, username }),
            _ => Err(TokenError::Expired),
        }
    }
}

/// Base64-encoded JSON carrying the shared secret as a tamper check
#[derive(Clone)]
pub struct SharedSecretTokenService {
    secret: String,
    ttl_secs: i64,
}

impl SharedSecretTokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

impl std::fmt::Debug for SharedSecretTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretTokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService for SharedSecretTokenService {
    fn issue_at(&self, user_id: i64, username: &str, now: i64) -> IssuedToken {
        let payload = serde_json::json!({
            "user_id": user_id,
            "username": username,
            "timestamp": now,
            "secret": self.secret,
        });

        IssuedToken {
            token: general_purpose::STANDARD.encode(payload.to_string()),
            issued_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
        }
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let bytes = general_purpose::STANDARD
            .decode(token.trim())
            .map_err(|_| TokenError::Undecodable)?;
        let payload = RawPayload::decode(&bytes)?;

        let secret = payload
            .secret
            .as_deref()
            .ok_or(TokenError::MissingField("secret"))?;
        if !constant_time_compare(secret, &self.secret) {
            return Err(TokenError::BadSecret);
        }

        payload.identity(self.ttl_secs, now)
    }

    fn scheme(&self) -> &'static str {
        "shared-secret"
    }
}

/// `base64url(payload).hex(hmac_sha256(secret, encoded_payload))`
#[derive(Clone)]
pub struct SignedTokenService {
    secret: String,
    ttl_secs: i64,
}

impl SignedTokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

impl std::fmt::Debug for SignedTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService for SignedTokenService {
    fn issue_at(&self, user_id: i64, username: &str, now: i64) -> IssuedToken {
        let payload = serde_json::json!({
            "user_id": user_id,
            "username": username,
            "timestamp": now,
        });
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature = compute_hmac_sha256(&self.secret, &encoded);

        IssuedToken {
            token: format!("{}.{}", encoded, signature),
            issued_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
        }
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let (encoded, signature) = token
            .trim()
            .split_once('.')
            .ok_or(TokenError::Undecodable)?;

        let expected = compute_hmac_sha256(&self.secret, encoded);
        if !constant_time_compare(signature, &expected) {
            return Err(TokenError::BadSecret);
        }

        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::Undecodable)?;
        RawPayload::decode(&bytes)?.identity(self.ttl_secs, now)
    }

    fn scheme(&self) -> &'static str {
        "hmac"
    }
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
