//! Password hashing and verification using bcrypt

use crate::core::error::{DexError, Result};

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password. Every call uses a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| DexError::HashingError(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash
    ///
    /// Input past `MAX_PASSWORD_BYTES` never matches. bcrypt would otherwise
    /// ignore the tail and accept any password sharing the first 72 bytes.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let matches = bcrypt::verify(password, hash)
            .map_err(|e| DexError::InvalidHashFormat(e.to_string()))?;
        Ok(matches && password.len() <= MAX_PASSWORD_BYTES)
    }

    /// `hash` on the blocking pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DexError::TaskError(format!("Hashing task panicked: {}", e)))?
    }

    /// `verify` on the blocking pool
    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DexError::TaskError(format!("Verification task panicked: {}", e)))?
    }
}
