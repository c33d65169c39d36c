//! Signed bearer tokens for authenticated endpoints.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

/// Longest token lifetime accepted, in minutes (one year).
pub const MAX_TOKEN_MINUTES: i64 = 525_600;

/// Errors produced while issuing or validating tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Encoding(String),
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates HS256 JWTs carrying a username subject.
///
/// Tokens are stateless: nothing is persisted, validity is decided by signature
/// and the `exp` claim alone.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_minutes: i64,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC signing secret shared by issuing and validation
    /// - `expires_minutes` - lifetime of tokens issued by [`Self::issue_access_token`]
    pub fn new(secret: &str, expires_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expires_minutes,
        }
    }

    /// Issues a token for `subject` using the configured lifetime.
    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_token(subject, self.expires_minutes)
    }

    /// Issues a token for `subject` that expires `ttl_minutes` from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if `ttl_minutes` exceeds [`MAX_TOKEN_MINUTES`]
    /// or signing fails.
    pub fn issue_token(&self, subject: &str, ttl_minutes: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = Some(ttl_minutes)
            .filter(|minutes| *minutes <= MAX_TOKEN_MINUTES)
            .and_then(Duration::try_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                TokenError::Encoding(format!("token lifetime of {} min out of range", ttl_minutes))
            })?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validates a token and returns its subject.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`] if the token is past its `exp`
    /// - [`TokenError::Invalid`] if the signature, algorithm or format is wrong
    pub fn validate_token(&self, token: &str) -> Result<String, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    /// Lifetime, in minutes, of tokens issued by [`Self::issue_access_token`].
    pub fn expires_minutes(&self) -> i64 {
        self.expires_minutes
    }
}
