//! Courier live-doc upload endpoint.
//!
//! - POST /uploads - multipart form with `order_id`, `motoboy`, `file`, and
//!   optional `lat` / `lon`

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::{Value, json};

use guriri_types::live_doc::LiveDocUpload;

use crate::http::error::AppError;
use crate::state::AppState;

/// Upper bound on a multipart upload body.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Default)]
struct UploadForm {
    order_id: Option<String>,
    motoboy: Option<String>,
    file: Option<(String, Vec<u8>)>,
    lat: Option<String>,
    lon: Option<String>,
}

impl UploadForm {
    fn into_upload(self) -> Result<LiveDocUpload, AppError> {
        let order_id = self
            .order_id
            .ok_or_else(|| AppError::Validation("Missing field: order_id".to_string()))?;
        let motoboy = self
            .motoboy
            .ok_or_else(|| AppError::Validation("Missing field: motoboy".to_string()))?;
        let (file_name, content) = self
            .file
            .ok_or_else(|| AppError::Validation("Missing field: file".to_string()))?;
        Ok(LiveDocUpload {
            order_id,
            motoboy,
            file_name,
            content,
            lat: self.lat,
            lon: self.lon,
        })
    }
}

/// POST /uploads
pub async fn upload_live_doc(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                form.file = Some((file_name, bytes.to_vec()));
            }
            "order_id" | "motoboy" | "lat" | "lon" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field {name}: {e}")))?;
                let slot = match name.as_str() {
                    "order_id" => &mut form.order_id,
                    "motoboy" => &mut form.motoboy,
                    "lat" => &mut form.lat,
                    _ => &mut form.lon,
                };
                *slot = Some(value);
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let meta = state.live_doc_service.upload(form.into_upload()?).await?;
    Ok(Json(json!({ "ok": true, "path": meta.path })))
}
