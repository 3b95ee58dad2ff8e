//! In-memory room registry with best-effort, self-healing fan-out.
//!
//! The registry maps a room key to the connections currently joined to it.
//! A room entry exists only while it has at least one member.
//!
//! Delivery is "at most best effort": each broadcast serializes the event
//! once, snapshots the room's membership, sends to every member
//! independently, and then removes the members whose send failed as a batch.
//! There is no liveness check; a dead connection is discovered the next time
//! something is sent to it. A send that does not complete within the send
//! timeout counts as failed, so a peer that stopped reading is dropped
//! instead of holding up the rest of the room.

use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use guriri_types::error::TransportError;
use guriri_types::event::{OutboundEvent, RoomEvent};
use guriri_types::room::ConnectionId;

use super::connection::RoomConnection;

/// Upper bound on a single send before the connection is treated as dead.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one broadcast call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Connections the frame was handed to successfully.
    pub delivered: usize,
    /// Connections whose send failed and that were removed.
    pub dropped: usize,
}

impl AddAssign for DeliveryReport {
    fn add_assign(&mut self, rhs: Self) {
        self.delivered += rhs.delivered;
        self.dropped += rhs.dropped;
    }
}

/// Room key -> live connections.
///
/// Membership lists are cloned (as `Arc`s) before any send is awaited, so no
/// shard lock is ever held across an await point.
pub struct RoomRegistry<C: RoomConnection> {
    rooms: DashMap<String, Vec<Arc<C>>>,
    send_timeout: Duration,
}

impl<C: RoomConnection> RoomRegistry<C> {
    /// Create an empty registry with [`DEFAULT_SEND_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_send_timeout(DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_send_timeout(send_timeout: Duration) -> Self {
        Self {
            rooms: DashMap::new(),
            send_timeout,
        }
    }

    /// Register an accepted connection under `room` and announce it.
    ///
    /// The join notice is broadcast to the whole room, including the
    /// connection that just joined.
    pub async fn admit(&self, room: &str, connection: Arc<C>) -> DeliveryReport {
        let connection_id = connection.id();
        let active = {
            let mut members = self.rooms.entry(room.to_string()).or_default();
            members.push(connection);
            members.len()
        };
        info!(room, %connection_id, active, "Connection admitted");

        self.broadcast(room, &OutboundEvent::now(RoomEvent::joined(room)))
            .await
    }

    /// Unregister a connection. Deletes the room entry once it is empty.
    ///
    /// Idempotent: returns `false` when the connection was not a member.
    pub fn remove(&self, room: &str, connection_id: ConnectionId) -> bool {
        let removed = match self.rooms.get_mut(room) {
            Some(mut members) => {
                let before = members.len();
                members.retain(|c| c.id() != connection_id);
                before != members.len()
            }
            None => false,
        };

        // Checked under the shard lock so a concurrent admit is never lost.
        self.rooms.remove_if(room, |_, members| members.is_empty());

        if removed {
            info!(
                room,
                %connection_id,
                remaining = self.connection_count(room),
                "Connection removed"
            );
        }
        removed
    }

    /// Deliver an event to every connection in `room`.
    ///
    /// Unknown rooms are a silent no-op. Send failures never propagate; the
    /// failing connections are removed after the fan-out completes.
    pub async fn broadcast(&self, room: &str, event: &OutboundEvent) -> DeliveryReport {
        let Some(members) = self.snapshot(room) else {
            debug!(room, kind = event.event.kind(), "Broadcast to empty room skipped");
            return DeliveryReport::default();
        };

        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(room, error = %err, "Failed to serialize outbound event");
                return DeliveryReport::default();
            }
        };

        self.deliver(room, &members, &frame).await
    }

    /// Deliver an event to every connection in every room.
    ///
    /// A send failure only removes the connection from its own room.
    pub async fn broadcast_all(&self, event: &OutboundEvent) -> DeliveryReport {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "Failed to serialize outbound event");
                return DeliveryReport::default();
            }
        };

        let snapshot: Vec<(String, Vec<Arc<C>>)> = self
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut report = DeliveryReport::default();
        for (room, members) in snapshot {
            report += self.deliver(&room, &members, &frame).await;
        }
        report
    }

    /// Number of rooms with at least one connection.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of connections in `room` (0 for unknown rooms).
    pub fn connection_count(&self, room: &str) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }

    /// Total connections across all rooms.
    pub fn total_connections(&self) -> usize {
        self.rooms.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether `room` currently has an entry.
    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    /// Keys of all live rooms, sorted.
    pub fn rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.rooms.iter().map(|e| e.key().clone()).collect();
        rooms.sort();
        rooms
    }

    fn snapshot(&self, room: &str) -> Option<Vec<Arc<C>>> {
        self.rooms.get(room).map(|members| members.value().clone())
    }

    async fn deliver(&self, room: &str, members: &[Arc<C>], frame: &str) -> DeliveryReport {
        let send_timeout = self.send_timeout;
        let results = join_all(members.iter().map(|connection| async move {
            let result = match tokio::time::timeout(send_timeout, connection.send(frame)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Send(format!(
                    "timed out after {} ms",
                    send_timeout.as_millis()
                ))),
            };
            (connection.id(), result)
        }))
        .await;

        let mut report = DeliveryReport::default();
        let mut failed = Vec::new();
        for (connection_id, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(room, %connection_id, error = %err, "Send failed, scheduling removal");
                    failed.push(connection_id);
                }
            }
        }

        for connection_id in failed {
            if self.remove(room, connection_id) {
                report.dropped += 1;
            }
        }
        report
    }
}

impl<C: RoomConnection> Default for RoomRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RoomConnection> std::fmt::Debug for RoomRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("rooms", &self.room_count())
            .field("connections", &self.total_connections())
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}
