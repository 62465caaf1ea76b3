pub mod favorites;
pub mod pokemon;
pub mod system;

pub use favorites::*;
pub use pokemon::*;
pub use system::*;

use crate::auth::jwt::TokenIssuer;
use crate::auth::service::AuthService;
use crate::core::pokedex::PokedexClient;
use crate::db::repository::{FavoriteRepository, UserRepository};
use axum::extract::FromRef;
use std::sync::Arc;

/// Shared application state for handlers. Everything in it is read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenIssuer>,
    pub user_repo: Arc<UserRepository>,
    pub favorite_repo: Arc<FavoriteRepository>,
    pub pokedex: Arc<PokedexClient>,
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
