//! Axum WebSocket adapter for the room registry.
//!
//! The socket is split: the sink half becomes a [`WsConnection`] registered
//! in the room, and the stream half feeds the chat session as text frames.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{BoxStream, SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt, future};
use tokio::sync::Mutex;

use guriri_core::room::connection::RoomConnection;
use guriri_types::error::TransportError;
use guriri_types::room::ConnectionId;

/// Send half of an accepted WebSocket.
///
/// The sink is behind a mutex because broadcasts from several tasks may
/// target the same connection concurrently.
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
        }
    }
}

impl RoomConnection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, frame: &str) -> Result<(), TransportError> {
        self.sink
            .lock()
            .await
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

/// Turn the receive half into a stream of text frames.
///
/// Ends at the first close frame. Binary, ping, and pong frames are skipped;
/// a receive error is yielded once and the session stops on it.
pub fn inbound_text_frames(
    stream: SplitStream<WebSocket>,
) -> BoxStream<'static, Result<String, TransportError>> {
    stream
        .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
        .filter_map(|msg| {
            future::ready(match msg {
                Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                Ok(_) => None,
                Err(err) => Some(Err(TransportError::Receive(err.to_string()))),
            })
        })
        .boxed()
}
