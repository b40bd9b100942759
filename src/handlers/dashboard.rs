//! Dashboard handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::middleware::auth::SessionContext;
use crate::models::{DetectionResult, SubscriptionPlan};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct QuotaView {
    pub used: u32,
    /// `None` means unlimited.
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_detections: u32,
    pub deepfakes_found: u32,
    pub success_rate: &'static str,
    pub plan: SubscriptionPlan,
    pub quota: QuotaView,
}

/// The account's stat tiles
pub async fn stats(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<DashboardStats>> {
    let user = state
        .accounts
        .get(ctx.user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(DashboardStats {
        total_detections: user.detections_made,
        deepfakes_found: (user.detections_made as f32 * 0.35).floor() as u32,
        success_rate: "94%",
        plan: user.plan,
        quota: QuotaView {
            used: user.detections_made,
            limit: user.plan.monthly_quota(),
        },
    }))
}

/// Detection history, newest first
pub async fn history(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<Vec<DetectionResult>>> {
    Ok(Json(state.accounts.history(ctx.user_id)))
}
