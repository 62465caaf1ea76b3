//! Signup and signin orchestration
//!
//! Ties the hasher, the token issuer and the injected user store together.
//! Each call is independent; the service holds only read-only state.

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{normalize_email, AuthResponse, SigninRequest, SignupRequest};
use crate::auth::password::PasswordHasher;
use crate::auth::store::{NewUser, StoredUser, UserStore};
use crate::core::config::AuthConfig;
use crate::core::error::{DexError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    operation_timeout: Duration,
    /// Verified against when an email is unknown, so both signin failure
    /// paths pay for one bcrypt verification
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
        operation_timeout: Duration,
    ) -> Result<Self> {
        let decoy_hash = hasher.hash("decoy-password-for-unknown-accounts")?;

        Ok(Self {
            store,
            hasher,
            tokens,
            operation_timeout,
            decoy_hash,
        })
    }

    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenIssuer>,
    ) -> Result<Self> {
        Self::new(
            store,
            PasswordHasher::new(config.bcrypt_cost),
            tokens,
            config.operation_timeout(),
        )
    }

    /// Register a new account and return a session for it
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse> {
        req.validate()?;
        let email = normalize_email(&req.email);

        if self
            .bounded("user lookup", self.store.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::info!(email = %email, "Signup rejected: email already registered");
            return Err(DexError::EmailAlreadyRegistered);
        }

        let password_hash = self
            .bounded("password hashing", self.hasher.hash_async(req.password))
            .await?;

        let new_user = NewUser {
            email,
            display_name: req.display_name.trim().to_string(),
        };
        let user = self
            .bounded("user insert", self.store.insert(&new_user, &password_hash))
            .await?;

        tracing::info!(user_id = user.id, email = %user.email, "User signed up");

        self.session_for(user)
    }

    /// Authenticate with email and password and return a session
    pub async fn signin(&self, req: SigninRequest) -> Result<AuthResponse> {
        req.validate()?;
        let email = normalize_email(&req.email);

        let user = self
            .bounded("user lookup", self.store.find_by_email(&email))
            .await?;

        let (hash, user) = match user {
            Some(user) => (user.password_hash.clone(), Some(user)),
            None => (self.decoy_hash.clone(), None),
        };

        let password_matches = self
            .bounded("password verification", self.hasher.verify_async(req.password, hash))
            .await?;

        match user {
            Some(user) if password_matches => {
                tracing::info!(user_id = user.id, "User signed in");
                self.session_for(user)
            }
            Some(user) => {
                tracing::info!(user_id = user.id, "Signin rejected: wrong password");
                Err(DexError::InvalidCredentials)
            }
            None => {
                tracing::info!(email = %email, "Signin rejected: unknown email");
                Err(DexError::InvalidCredentials)
            }
        }
    }

    fn session_for(&self, user: StoredUser) -> Result<AuthResponse> {
        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.operation_timeout, fut)
            .await
            .map_err(|_| DexError::Timeout(format!("{} exceeded {:?}", operation, self.operation_timeout)))?
    }
}
