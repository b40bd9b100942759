//! Profile and preferences handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::auth::SessionContext;
use crate::models::{FontSize, Theme, User};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(contains(pattern = "@", message = "Valid email is required"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
}

/// Current user's profile
pub async fn get(State(state): State<AppState>, ctx: SessionContext) -> AppResult<Json<User>> {
    let user = state
        .accounts
        .get(ctx.user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// Update profile fields; written only on explicit save
pub async fn update(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    req.validate()?;
    let user = state.accounts.update_profile(ctx.user_id, req.name, req.email)?;
    Ok(Json(user))
}

/// Update theme / font size preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(req): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .accounts
        .update_preferences(ctx.user_id, req.theme, req.font_size)?;
    Ok(Json(user))
}
