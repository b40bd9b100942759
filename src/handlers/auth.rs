//! Authentication handlers
//!
//! Credentials resolve against the in-memory account registry, which is
//! seeded with the two demo fixtures. Tokens are opaque; only their SHA-256
//! hash is kept server-side.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::auth::SessionContext;
use crate::models::{LoginRequest, LoginResponse, SubscriptionPlan, UserRole};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(contains(pattern = "@", message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("general".to_string(), "Email and password are required".to_string());
        return Err(AppError::Validation(fields));
    }

    let user = state.accounts.authenticate(&req.email, &req.password)?;
    let token = state.sessions.create(&user, state.config.session_ttl_hours);

    tracing::info!("User logged in: {} ({})", user.email, user.role.as_str());

    Ok(Json(LoginResponse { token, user }))
}

/// Signup endpoint; a valid signup logs straight in.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    req.validate()?;

    let name = req.name.trim();
    if name.is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Name is required".to_string());
        return Err(AppError::Validation(fields));
    }

    let user = state.accounts.create(
        name,
        &req.email,
        &req.password,
        UserRole::User,
        SubscriptionPlan::Free,
    )?;
    let token = state.sessions.create(&user, state.config.session_ttl_hours);

    tracing::info!("New account registered: {}", user.email);

    Ok((StatusCode::CREATED, Json(LoginResponse { token, user })))
}

/// Logout endpoint: tears down the login session and its detection slot.
pub async fn logout(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<StatusCode> {
    if let Some(session_id) = state.sessions.remove(&ctx.token_hash) {
        state.detections.remove(session_id);
    }
    tracing::info!("User logged out: {}", ctx.user_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            name: "New User".to_string(),
            email: "new@example.com".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn test_signup_requires_at_sign_in_email() {
        let mut req = valid_signup();
        req.email = "not-an-email".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_signup_requires_eight_char_password() {
        let mut req = valid_signup();
        req.password = "short".to_string();
        req.confirm_password = "short".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_signup_requires_matching_passwords() {
        let mut req = valid_signup();
        req.confirm_password = "different1".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_signup_requires_name() {
        let mut req = valid_signup();
        req.name = String::new();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
