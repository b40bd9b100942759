//! Assistant handlers

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::logic::assistant;
use crate::middleware::auth::SessionContext;
use crate::models::{AssistantMessage, MessageRole};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub reply: AssistantMessage,
}

/// Send a message to the assistant and receive the canned reply
pub async fn send_message(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("content".to_string(), "Message is required".to_string());
        return Err(AppError::Validation(fields));
    }

    state
        .sessions
        .push_message(&ctx.token_hash, AssistantMessage::new(MessageRole::User, content.clone()));

    // Simulated think time
    tokio::time::sleep(Duration::from_millis(assistant::THINK_DELAY_MS)).await;

    let reply = AssistantMessage::new(MessageRole::Assistant, assistant::reply_for(&content));
    state.sessions.push_message(&ctx.token_hash, reply.clone());

    Ok(Json(SendMessageResponse { reply }))
}

/// Conversation transcript for this login session
pub async fn list_messages(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<Json<Vec<AssistantMessage>>> {
    Ok(Json(state.sessions.messages(&ctx.token_hash)))
}

/// Clear the conversation transcript
pub async fn clear_messages(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<StatusCode> {
    state.sessions.clear_messages(&ctx.token_hash);
    Ok(StatusCode::NO_CONTENT)
}
