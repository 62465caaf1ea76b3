use crate::core::error::{DexError, Result};
use crate::db::models::NewFavorite;
use serde::Deserialize;

// Favorites API models

/// Request body for POST /api/me/favorites
#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub pokemon: String,
    pub ability: Option<String>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
}

impl TryFrom<CreateFavoriteRequest> for NewFavorite {
    type Error = DexError;

    fn try_from(req: CreateFavoriteRequest) -> Result<Self> {
        let pokemon = req.pokemon.trim().to_string();
        if pokemon.is_empty() {
            return Err(DexError::ValidationError("pokemon cannot be empty".to_string()));
        }

        Ok(NewFavorite {
            pokemon,
            ability: req.ability,
            height: req.height,
            weight: req.weight,
        })
    }
}
