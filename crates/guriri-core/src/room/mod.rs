//! Room membership and fan-out.
//!
//! - `RoomConnection`: the send seam every transport implements
//! - `RoomRegistry`: room id -> live connections, with best-effort broadcast

pub mod connection;
pub mod registry;
