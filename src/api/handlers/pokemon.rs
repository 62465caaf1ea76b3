use crate::api::models::PokemonSearchQuery;
use crate::auth::middleware::AuthUser;
use crate::core::error::Result;
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use super::AppState;

/// Handler for GET /api/pokemonapi - Search the upstream Pokédex
pub async fn search_pokemon(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PokemonSearchQuery>,
) -> Result<Json<Vec<Value>>> {
    tracing::debug!(user_id = user.user_id, search = ?query.search, "Pokemon search");

    let results = state.pokedex.search(query.search.as_deref()).await?;
    Ok(Json(results))
}
