//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{AuthResponse, SigninRequest, SignupRequest, UserProfile};
use crate::core::error::{DexError, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Handler for POST /api/auth/signup - User registration
pub async fn signup(
    State(state): State<AppState>,
    body: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body.map_err(malformed_body)?;
    tracing::info!(email = %req.email, "Signup attempt");

    let response: AuthResponse = state.auth.signup(req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /api/auth/signin - User login
pub async fn signin(
    State(state): State<AppState>,
    body: std::result::Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(req) = body.map_err(malformed_body)?;
    tracing::info!(email = %req.email, "Signin attempt");

    Ok(Json(state.auth.signin(req).await?))
}

/// Handler for GET /api/me - Get current user info
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserProfile>> {
    let profile = state
        .user_repo
        .find_by_id(user.user_id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| DexError::NotFound("User not found".to_string()))?;

    Ok(Json(profile))
}

fn malformed_body(rejection: JsonRejection) -> DexError {
    DexError::InvalidRequest(rejection.body_text())
}
