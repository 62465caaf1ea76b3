//! Repository implementations for the data access layer

use crate::auth::store::{NewUser, StoredUser, UserStore};
use crate::core::error::{DexError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Favorite, NewFavorite};
use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension, Row};
use std::sync::Arc;

/// Repository for users
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoredUser>> {
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, email, hash, display_name FROM users WHERE id = ?",
                        [id],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, email, hash, display_name FROM users WHERE email = ?",
                        [&email],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn insert(&self, user: &NewUser, password_hash: &str) -> Result<StoredUser> {
        let user = user.clone();
        let password_hash = password_hash.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (email, hash, display_name) VALUES (?, ?, ?)",
                    rusqlite::params![&user.email, &password_hash, &user.display_name],
                )
                .map_err(|e| match e.sqlite_error_code() {
                    Some(ErrorCode::ConstraintViolation) => DexError::EmailAlreadyRegistered,
                    _ => DexError::DatabaseError(e),
                })?;

                Ok(StoredUser {
                    id: conn.last_insert_rowid(),
                    email: user.email,
                    password_hash,
                    display_name: user.display_name,
                })
            })
            .await
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<StoredUser> {
    Ok(StoredUser {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        display_name: row.get(3)?,
    })
}

const FAVORITE_COLUMNS: &str = "id, pokemon, ability, height, weight, user_id, created_at";

/// Repository for favorites. Every query is scoped by owner.
pub struct FavoriteRepository {
    db: Arc<DatabaseManager>,
}

impl FavoriteRepository {
    /// Create a new FavoriteRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Get all favorites for a user, newest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Favorite>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM favorites WHERE user_id = ? ORDER BY id DESC",
                    FAVORITE_COLUMNS
                ))?;

                let favorites = stmt
                    .query_map([user_id], favorite_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(favorites)
            })
            .await
    }

    /// Save a favorite for a user
    pub async fn create(&self, user_id: i64, favorite: &NewFavorite) -> Result<Favorite> {
        let favorite = favorite.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO favorites (pokemon, ability, height, weight, user_id) \
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &favorite.pokemon,
                        &favorite.ability,
                        &favorite.height,
                        &favorite.weight,
                        user_id,
                    ],
                )?;

                let id = conn.last_insert_rowid();
                Ok(conn.query_row(
                    &format!("SELECT {} FROM favorites WHERE id = ?", FAVORITE_COLUMNS),
                    [id],
                    favorite_from_row,
                )?)
            })
            .await
    }

    /// Delete every favorite of a user, returning the deleted rows
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<Vec<Favorite>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "DELETE FROM favorites WHERE user_id = ? RETURNING {}",
                    FAVORITE_COLUMNS
                ))?;

                let deleted = stmt
                    .query_map([user_id], favorite_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(deleted)
            })
            .await
    }

    /// Delete one favorite if it belongs to the user
    pub async fn delete_for_user(&self, user_id: i64, favorite_id: i64) -> Result<Option<Favorite>> {
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!(
                            "DELETE FROM favorites WHERE id = ? AND user_id = ? RETURNING {}",
                            FAVORITE_COLUMNS
                        ),
                        [favorite_id, user_id],
                        favorite_from_row,
                    )
                    .optional()?)
            })
            .await
    }
}

fn favorite_from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        id: row.get(0)?,
        pokemon: row.get(1)?,
        ability: row.get(2)?,
        height: row.get(3)?,
        weight: row.get(4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}
