//! Authentication request/response models

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::auth::store::StoredUser;
use crate::core::error::{DexError, Result};
use serde::{Deserialize, Serialize};

/// Signup request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;

        if self.password.is_empty() {
            return Err(DexError::ValidationError("password cannot be empty".to_string()));
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(DexError::ValidationError(format!(
                "password cannot be longer than {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        if self.display_name.trim().is_empty() {
            return Err(DexError::ValidationError("displayName cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(DexError::ValidationError(
                "email and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token plus profile, returned by signup and signin
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Public view of a user (never includes the hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// Canonical form of an email for storage and lookup.
///
/// Applied on both signup and signin so that case variants of one address
/// always resolve to the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(DexError::ValidationError(
            "email must look like name@domain".to_string(),
        )),
    }
}
