//! Outbound wire events fanned out to room connections.
//!
//! Every frame a client receives is an [`OutboundEvent`]: a `type`
//! discriminator, a kind-specific `payload`, and the `ts` stamped when the
//! event was built for broadcast.
//!
//! ```json
//! {"type": "chat", "payload": {"from": "cliente", "text": "oi", "meta": {}}, "ts": "..."}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::ModeChange;
use crate::live_doc::LiveDocMeta;
use crate::order::Order;

/// Text of the in-room notice sent when a `/thor` command is rejected.
pub const THOR_DENIED_NOTICE: &str = "/thor denied: not admin";

/// Payload of a `chat` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub from: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// The kinds of event a room connection can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A chat line from a participant or the assistant.
    Chat(ChatPayload),
    /// A presence or denial notice (`join:<room>`, `left:<room>`, ...).
    System(String),
    /// A new order was created.
    NewPedido(Order),
    /// A courier uploaded a live doc for the room's order.
    LiveDocUploaded(LiveDocMeta),
    /// Assistant mode was switched on or off.
    SchumacherMode(ModeChange),
}

impl RoomEvent {
    /// Presence notice for a connection joining `room`.
    pub fn joined(room: &str) -> Self {
        RoomEvent::System(format!("join:{room}"))
    }

    /// Presence notice for a connection leaving `room`.
    pub fn left(room: &str) -> Self {
        RoomEvent::System(format!("left:{room}"))
    }

    /// Short kind name, matching the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::Chat(_) => "chat",
            RoomEvent::System(_) => "system",
            RoomEvent::NewPedido(_) => "new_pedido",
            RoomEvent::LiveDocUploaded(_) => "live_doc_uploaded",
            RoomEvent::SchumacherMode(_) => "schumacher_mode",
        }
    }
}

/// A [`RoomEvent`] stamped with its broadcast time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    #[serde(flatten)]
    pub event: RoomEvent,
    pub ts: DateTime<Utc>,
}

impl OutboundEvent {
    /// Stamp an event with the current time.
    pub fn now(event: RoomEvent) -> Self {
        Self::at(event, Utc::now())
    }

    /// Stamp an event with an explicit time.
    pub fn at(event: RoomEvent, ts: DateTime<Utc>) -> Self {
        Self { event, ts }
    }

    /// Serialize into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
