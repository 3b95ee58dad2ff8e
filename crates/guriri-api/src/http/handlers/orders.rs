//! Order creation endpoint.
//!
//! - POST /orders - persist a new order and announce it to every room

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use guriri_types::order::NewOrder;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /orders
///
/// Responds with `{"id": "<epoch millis>"}`. Nothing is broadcast when the
/// order cannot be stored.
pub async fn create_order(
    State(state): State<AppState>,
    Json(new): Json<NewOrder>,
) -> Result<Json<Value>, AppError> {
    let order = state.order_service.create_order(new).await?;
    Ok(Json(json!({ "id": order.id })))
}
