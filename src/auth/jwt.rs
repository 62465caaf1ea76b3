//! JWT session token generation and validation
//!
//! Tokens are HS256-signed and stateless: validity is recomputed from the
//! token on every request, so there is no server-side revocation.

use crate::core::config::AuthConfig;
use crate::core::error::{DexError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id, decimal string as RFC 7519 expects
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds), absent when expiry is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and verifies session tokens with the server's signing secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    /// Create an issuer. `ttl == None` disables expiry.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = ttl.is_some();
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl())
    }

    /// Issue a token for a user, stamped with the current time
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token with an explicit issued-at time
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let exp = match self.ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| DexError::TokenIssueError(format!("Invalid token ttl: {}", e)))?;
                let expires_at = issued_at
                    .checked_add_signed(ttl)
                    .ok_or_else(|| DexError::TokenIssueError("Failed to calculate expiration".to_string()))?;
                Some(expires_at.timestamp())
            }
            None => None,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DexError::TokenIssueError(e.to_string()))
    }

    /// Validate a token and return its full claims
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DexError::TokenSignatureInvalid,
                ErrorKind::ExpiredSignature => DexError::TokenExpired,
                _ => DexError::TokenMalformed(e.to_string()),
            })
    }

    /// Validate a token and return the subject user id
    pub fn verify(&self, token: &str) -> Result<i64> {
        let claims = self.decode(token)?;
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| DexError::TokenMalformed(format!("Subject is not a user id: {}", claims.sub)))
    }
}
