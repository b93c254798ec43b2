//! Assistant chat endpoints

use axum::{extract::State, Json};
use oerc_common::models::ChatMessage;
use serde::{Deserialize, Serialize};

use super::{ApiError, CurrentVisitor};
use crate::views::chat::ask;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub pending: bool,
    pub messages: Vec<ChatMessage>,
}

/// GET /api/chat
pub async fn transcript(visitor: CurrentVisitor) -> Json<TranscriptResponse> {
    let chat = visitor.0.chat.lock().await;
    Json(TranscriptResponse {
        pending: chat.is_pending(),
        messages: chat.messages().to_vec(),
    })
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

/// POST /api/chat
pub async fn send(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Json(request): Json<AskRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    let reply = ask(&visitor.0.chat, &state.chat, &request.message).await?;
    Ok(Json(reply))
}
