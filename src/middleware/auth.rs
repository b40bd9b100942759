//! Authentication middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::state::SessionLookup;
use crate::models::UserRole;
use crate::{AppError, AppState};

/// Login session context extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub token_hash: String,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// RBAC: Require admin role
pub fn require_admin(ctx: &SessionContext) -> Result<(), AppError> {
    if !ctx.is_admin() {
        tracing::warn!(
            "Admin required but user {} has role '{}'",
            ctx.user_id,
            ctx.role.as_str()
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Middleware: Require an active login session
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;
    let token_hash = hash_token(&token);

    match state.sessions.resolve(&token_hash) {
        SessionLookup::Active(ctx) => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        SessionLookup::Expired(session_id) => {
            // The detection slot dies with the login session.
            state.detections.remove(session_id);
            tracing::debug!("Expired session evicted: {}", session_id);
            Err(AppError::SessionExpired)
        }
        SessionLookup::Missing => Err(AppError::Unauthorized),
    }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Unauthorized);
    }

    Ok(auth_header[7..].to_string())
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

// Implement FromRequestParts for SessionContext
#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
