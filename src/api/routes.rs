//! API routes

use crate::api::handlers::{
    add_favorite, clear_favorites, get_favorites, health_check, remove_favorite, search_pokemon,
    AppState,
};
use crate::auth::handlers::{get_me, signin, signup};
use crate::auth::middleware::require_auth;
use crate::core::error::DexError;
use axum::{
    middleware,
    routing::{any, delete, get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/health", get(health_check));

    // Everything else under /api requires a bearer token
    let protected_routes = Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/me/favorites",
            get(get_favorites).post(add_favorite).delete(clear_favorites),
        )
        .route("/api/me/favorites/:id", delete(remove_favorite))
        .route("/api/pokemonapi", get(search_pokemon))
        .route("/api/*rest", any(api_not_found))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(protected_routes).with_state(state)
}

/// Authenticated request for an API path that does not exist
async fn api_not_found() -> DexError {
    DexError::NotFound("No such API endpoint".to_string())
}
