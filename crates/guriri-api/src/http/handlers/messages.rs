//! Room history.
//!
//! - GET /rooms/{room}/messages?limit=N - newest first, default 200

use axum::Json;
use axum::extract::{Path, Query, State};

use guriri_types::message::ChatRecord;

use crate::http::error::AppError;
use crate::http::extractors::query::HistoryQuery;
use crate::state::AppState;

/// GET /rooms/{room}/messages
pub async fn room_history(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatRecord>>, AppError> {
    let records = state.chat_service.history(&room, query.limit).await?;
    Ok(Json(records))
}
