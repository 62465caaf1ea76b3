//! Pokédex Backend Library
//!
//! This library provides the core functionality for the Pokédex backend,
//! including account authentication, favorites storage and the REST API.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{Config, DexError};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
