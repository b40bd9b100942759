//! Detection pipeline handlers
//!
//! The request/response shapes here are the contract a real inference
//! backend would have to honor.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::logic::media;
use crate::logic::session::SessionState;
use crate::middleware::auth::SessionContext;
use crate::models::{DetectionResult, MediaKind};
use crate::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub filename: Option<String>,
    /// Declared MIME type of the media (e.g. `video/mp4`). Optional: when
    /// absent the kind is guessed from the filename extension.
    pub content_type: Option<String>,
}

/// Externally visible view of the detection session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_kind: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DetectionResult>,
}

impl From<SessionState> for SessionView {
    fn from(state: SessionState) -> Self {
        let label = state.as_str();
        match state {
            SessionState::Idle | SessionState::Aborted => Self {
                state: label,
                filename: None,
                media_kind: None,
                result: None,
            },
            SessionState::Analyzing {
                filename,
                media_kind,
                ..
            } => Self {
                state: label,
                filename: Some(filename),
                media_kind: Some(media_kind),
                result: None,
            },
            SessionState::Complete(result) => Self {
                state: label,
                filename: Some(result.filename.clone()),
                media_kind: Some(result.media_kind),
                result: Some(result),
            },
        }
    }
}

/// Submit media for analysis
pub async fn submit(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(req): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let filename = req
        .filename
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(DetectError::MissingFile)?;

    let media_kind = media::classify(req.content_type.as_deref(), &filename)?;

    let new_state = state.detections.submit(
        ctx.session_id,
        ctx.user_id,
        filename,
        media_kind,
        Arc::clone(&state.provider),
        Arc::clone(&state.accounts),
    )?;

    Ok((StatusCode::ACCEPTED, Json(new_state.into())))
}

/// Current state of the caller's detection session
pub async fn status(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.detections.snapshot(ctx.session_id).into()))
}

/// Cancel the in-flight analysis
pub async fn cancel(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<SessionView>> {
    let new_state = state.detections.cancel(ctx.session_id)?;
    Ok(Json(new_state.into()))
}

/// Discard the stored result and return to idle
pub async fn reset(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.detections.reset(ctx.session_id).into()))
}
