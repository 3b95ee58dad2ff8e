use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use guriri_core::completion::provider::CompletionProvider;

use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let chat = &state.chat_service;
    let registry = chat.registry();
    Json(json!({
        "ok": true,
        "assistant_active": chat.gate().is_active(),
        "model": chat.provider().model(),
        "rooms": registry.room_count(),
        "connections": registry.total_connections(),
    }))
}
