//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Favorites and Pokédex search handlers
//! - Request tracing middleware

pub mod server;
pub mod routes;
pub mod middleware;
pub mod handlers;
pub mod models;

pub use handlers::AppState;
pub use middleware::{trace_id_middleware, TRACE_ID_HEADER};
pub use server::ApiServer;
