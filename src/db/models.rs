//! Database models
//!
//! Data structures representing database tables. Users map onto
//! `auth::store::StoredUser`.

use serde::{Deserialize, Serialize};

/// Favorite record in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub pokemon: String,
    pub ability: Option<String>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub user_id: i64,
    pub created_at: String,
}

/// Fields supplied when saving a favorite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    pub pokemon: String,
    pub ability: Option<String>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
}
