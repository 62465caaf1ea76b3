use crate::api::models::CreateFavoriteRequest;
use crate::auth::middleware::AuthUser;
use crate::core::error::{DexError, Result};
use crate::db::models::{Favorite, NewFavorite};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use super::AppState;

/// Handler for GET /api/me/favorites - Get the caller's favorites
pub async fn get_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Favorite>>> {
    let favorites = state.favorite_repo.list_for_user(user.user_id).await?;
    Ok(Json(favorites))
}

/// Handler for POST /api/me/favorites - Save a pokemon as favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    body: std::result::Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body.map_err(|e| DexError::InvalidRequest(e.body_text()))?;
    let new_favorite = NewFavorite::try_from(req)?;

    let favorite = state.favorite_repo.create(user.user_id, &new_favorite).await?;

    tracing::info!(
        user_id = user.user_id,
        favorite_id = favorite.id,
        pokemon = %favorite.pokemon,
        "Favorite added"
    );

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Handler for DELETE /api/me/favorites - Remove all of the caller's favorites
pub async fn clear_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Favorite>>> {
    let deleted = state.favorite_repo.delete_all_for_user(user.user_id).await?;

    tracing::info!(user_id = user.user_id, count = deleted.len(), "Favorites cleared");

    Ok(Json(deleted))
}

/// Handler for DELETE /api/me/favorites/:id - Remove one of the caller's favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Favorite>> {
    let Path(favorite_id) = path.map_err(|e| DexError::InvalidRequest(e.body_text()))?;
    let deleted = state
        .favorite_repo
        .delete_for_user(user.user_id, favorite_id)
        .await?
        .ok_or_else(|| DexError::NotFound(format!("Favorite {} not found", favorite_id)))?;

    tracing::info!(user_id = user.user_id, favorite_id, "Favorite removed");

    Ok(Json(deleted))
}
