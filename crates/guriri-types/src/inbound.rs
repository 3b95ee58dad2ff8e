//! Inbound frames received on a room connection.
//!
//! Clients are expected to send `{"type": "chat", "payload": {"from", "text",
//! "meta"}}`, but older clients send bare text or a top-level `text` field.
//! [`InboundFrame::parse`] never fails: anything that is not a JSON object is
//! kept as [`InboundFrame::Raw`]. [`InboundFrame::into_chat_line`] resolves
//! both shapes into a single normalized [`ChatLine`].

use serde_json::{Map, Value};

use crate::message::UNKNOWN_SENDER;

/// A frame as received, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// A JSON object.
    Structured(Map<String, Value>),
    /// Plain text, malformed JSON, or JSON that is not an object.
    Raw(String),
}

/// A normalized chat line extracted from an inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub sender: String,
    pub text: String,
    /// Always a JSON object.
    pub meta: Value,
}

impl InboundFrame {
    /// Classify a received text frame.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => InboundFrame::Structured(map),
            _ => InboundFrame::Raw(raw.to_string()),
        }
    }

    /// Resolve the frame into a chat line, applying field defaults.
    pub fn into_chat_line(self) -> ChatLine {
        match self {
            InboundFrame::Raw(text) => ChatLine {
                sender: UNKNOWN_SENDER.to_string(),
                text,
                meta: Value::Object(Map::new()),
            },
            InboundFrame::Structured(map) => {
                let payload = map.get("payload").and_then(Value::as_object);

                let sender = payload
                    .and_then(|p| non_null(p.get("from")))
                    .map(value_to_text)
                    .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

                let text = payload
                    .and_then(|p| non_null(p.get("text")))
                    .or_else(|| non_null(map.get("text")))
                    .map(value_to_text)
                    .unwrap_or_else(|| Value::Object(map.clone()).to_string());

                let meta = payload
                    .and_then(|p| p.get("meta"))
                    .filter(|m| m.is_object())
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new()));

                ChatLine { sender, text, meta }
            }
        }
    }
}

impl ChatLine {
    /// Admin credential carried in `meta.admin_token`, if any.
    pub fn admin_token(&self) -> Option<&str> {
        self.meta.get("admin_token").and_then(Value::as_str)
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
