//! Live-doc download for clients.
//!
//! - GET /docs/clients/{client_id} - first stored upload whose name contains
//!   the client id, as an attachment

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /docs/clients/{client_id}
pub async fn client_live_doc(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Response, AppError> {
    let file = state.live_doc_service.find_for_client(&client_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}
