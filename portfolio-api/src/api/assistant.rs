use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use interfaces::ChatRole;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::models::{AssistantStatus, ChatReply, ChatRequest, History, HistoryEntry, SessionQuery};
use crate::api::validation::{present, ApiJson};
use crate::error::{AppError, Result};
use crate::AppState;

pub const CONTEXT_TURNS: usize = 10;
pub const HISTORY_TURNS: usize = 50;

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Explicit id, else the client address, else a fresh guest id.
pub fn resolve_session_id(explicit: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    match forwarded_for(headers) {
        Some(addr) => format!("guest_{}", addr),
        None => format!("guest_{}", Uuid::new_v4()),
    }
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let message = present(&body.message)
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("Message is required"))?;

    let session_id = resolve_session_id(body.session_id.as_deref(), &headers);
    debug!("Chat message for session {}", session_id);

    let history = match state.store.recent_turns(&session_id, CONTEXT_TURNS).await {
        Ok(turns) => turns,
        Err(e) => {
            warn!("Could not load history for {}: {}", session_id, e);
            Vec::new()
        }
    };

    if let Err(e) = state.store.append_turn(&session_id, ChatRole::User, &message).await {
        warn!("Database error saving user message: {}", e);
    }

    let reply = state.assistant.reply(&message, &history).await;

    if let Err(e) = state.store.append_turn(&session_id, ChatRole::Assistant, &reply).await {
        warn!("Database error saving assistant message: {}", e);
    }

    Ok(Json(ChatReply { reply, session_id }))
}

pub async fn status(Query(query): Query<SessionQuery>) -> Json<AssistantStatus> {
    Json(AssistantStatus {
        message: "Assistant API working".to_string(),
        session_id: present(&query.session_id).unwrap_or("guest").to_string(),
    })
}

pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SessionQuery>,
) -> Result<Json<History>> {
    let session_id = match present(&query.session_id) {
        Some(id) => id.trim().to_string(),
        None => format!("guest_{}", forwarded_for(&headers).unwrap_or_else(|| "anonymous".to_string())),
    };

    let turns = state
        .store
        .recent_turns(&session_id, HISTORY_TURNS)
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch conversation history"))?;

    let messages = turns
        .into_iter()
        .map(|turn| HistoryEntry {
            role: turn.role,
            text: turn.message,
            timestamp: turn.created_at,
        })
        .collect();

    Ok(Json(History { messages }))
}
