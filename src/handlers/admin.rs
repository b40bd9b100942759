//! Admin handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::middleware::auth::{require_admin, SessionContext};
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub total_users: usize,
    pub active_sessions: usize,
    pub total_detections: u64,
    pub environment: String,
}

/// Platform-wide counters for the admin console
pub async fn overview(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<AdminOverview>> {
    require_admin(&ctx)?;

    Ok(Json(AdminOverview {
        total_users: state.accounts.count(),
        active_sessions: state.sessions.active_count(),
        total_detections: state.accounts.total_detections(),
        environment: state.config.environment.clone(),
    }))
}
