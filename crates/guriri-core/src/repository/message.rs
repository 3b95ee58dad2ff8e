//! MessageRepository trait definition.

use guriri_types::error::RepositoryError;
use guriri_types::message::ChatRecord;

/// Append-only chat record storage.
pub trait MessageRepository: Send + Sync + 'static {
    /// Persist a chat record.
    fn save_message(
        &self,
        record: &ChatRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Most recent records in a room, newest first.
    fn recent_messages(
        &self,
        room: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatRecord>, RepositoryError>> + Send;

    /// Total records across all rooms.
    fn count_messages(&self)
    -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
