//! RoomConnection trait definition.

use guriri_types::error::TransportError;
use guriri_types::room::ConnectionId;

/// One live, already-accepted bidirectional channel.
///
/// Only the outbound half is modeled here; the inbound half is consumed by
/// the chat session loop as a stream. Implementations live in guriri-api
/// (the axum WebSocket adapter) and in test fakes.
pub trait RoomConnection: Send + Sync + 'static {
    /// Stable identity used for removal.
    fn id(&self) -> ConnectionId;

    /// Send one text frame. A failure marks the connection as dead.
    fn send(
        &self,
        frame: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
