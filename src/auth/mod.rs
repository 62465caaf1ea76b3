//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Signup and signin
//! - JWT session token issuing and verification
//! - Password hashing and verification
//! - The gate guarding protected routes
//! - The user storage boundary the host application implements

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;

pub use handlers::{get_me, signin, signup};
pub use jwt::{Claims, TokenIssuer};
pub use middleware::{authorize, require_auth, AuthUser};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use store::{NewUser, StoredUser, UserStore};
