//! Core application layer
//!
//! This module provides:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - The outbound Pokédex API client

pub mod config;
pub mod error;
pub mod logging;
pub mod pokedex;

pub use config::Config;
pub use error::{DexError, ErrorResponse, Result};
pub use logging::Logger;
pub use pokedex::PokedexClient;
