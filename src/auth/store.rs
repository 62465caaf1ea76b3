//! User storage boundary for the auth subsystem
//!
//! The auth core only needs two capabilities from persistence. Keeping them
//! behind a trait means nothing in `auth` depends on the storage engine.

use crate::core::error::Result;
use async_trait::async_trait;

/// A user as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

/// Fields needed to create a user; the hash is passed separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>>;

    /// Insert a user and return it with its generated id.
    ///
    /// Fails with `EmailAlreadyRegistered` when the email is taken.
    async fn insert(&self, user: &NewUser, password_hash: &str) -> Result<StoredUser>;
}
