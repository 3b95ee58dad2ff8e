//! Room WebSocket endpoint.
//!
//! `GET /rooms/{room}` upgrades the connection, joins the room, and runs the
//! chat loop until the client disconnects. Every text frame goes through the
//! chat service pipeline; everything the room receives is pushed back as a
//! JSON text frame.

use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::StreamExt;

use guriri_core::chat::session::ChatSession;

use crate::http::ws_connection::{WsConnection, inbound_text_frames};
use crate::state::AppState;

pub async fn room_ws(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_room_session(socket, room, state))
}

async fn run_room_session(socket: WebSocket, room: String, state: AppState) {
    let (sink, stream) = socket.split();
    let connection = Arc::new(WsConnection::new(sink));
    let session = ChatSession::new(Arc::clone(&state.chat_service), room, connection);

    session.run(inbound_text_frames(stream)).await;
}
