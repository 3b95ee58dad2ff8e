//! Assistant mode toggle.
//!
//! - POST /admin/assistant-mode?action=on|off
//!
//! The credential is checked before the action so a caller without it
//! always gets 401. The action must be exactly `on` or `off`.

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};

use guriri_core::assistant::command::AssistantCommand;
use guriri_types::assistant::ModeOrigin;

use crate::http::error::AppError;
use crate::http::extractors::admin::AdminCredential;
use crate::http::extractors::query::ModeQuery;
use crate::state::AppState;

/// POST /admin/assistant-mode
pub async fn set_assistant_mode(
    State(state): State<AppState>,
    credential: AdminCredential,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Value>, AppError> {
    let service = &state.chat_service;
    service
        .gate()
        .authorize(ModeOrigin::Http, credential.as_deref())?;

    let command = match query.action.as_deref() {
        Some("on") => AssistantCommand::On,
        Some("off") => AssistantCommand::Off,
        _ => {
            return Err(AppError::Validation(
                "action must be 'on' or 'off'".to_string(),
            ));
        }
    };

    service
        .set_assistant_mode(command.activates(), ModeOrigin::Http, credential.as_deref())
        .await?;

    Ok(Json(json!({ "ok": true, "assume": command.activates() })))
}
