//! SQLite chat record repository implementation.
//!
//! Timestamps are stored as fixed-width RFC 3339 (microseconds, `Z`) so that
//! text ordering matches time ordering.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use guriri_core::repository::message::MessageRepository;
use guriri_types::error::RepositoryError;
use guriri_types::message::ChatRecord;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository` (table `messages`).
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    room: String,
    sender: String,
    text: String,
    meta: String,
    ts: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            room: row.try_get("room")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            meta: row.try_get("meta")?,
            ts: row.try_get("ts")?,
        })
    }

    fn into_record(self) -> Result<ChatRecord, RepositoryError> {
        let meta: serde_json::Value = serde_json::from_str(&self.meta)
            .map_err(|e| RepositoryError::Query(format!("invalid meta JSON: {e}")))?;
        Ok(ChatRecord {
            id: self.id,
            room: self.room,
            sender: self.sender,
            text: self.text,
            meta,
            ts: parse_datetime(&self.ts)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl MessageRepository for SqliteMessageRepository {
    async fn save_message(&self, record: &ChatRecord) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO messages (id, room, sender, text, meta, ts) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&record.id)
            .bind(&record.room)
            .bind(&record.sender)
            .bind(&record.text)
            .bind(record.meta.to_string())
            .bind(format_datetime(&record.ts))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn recent_messages(
        &self,
        room: &str,
        limit: i64,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, room, sender, text, meta, ts FROM messages \
             WHERE room = ? ORDER BY ts DESC, rowid DESC LIMIT ?",
        )
        .bind(room)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_record()
            })
            .collect()
    }

    async fn count_messages(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        row.try_get("count")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_repo() -> (SqliteMessageRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("messages.db"))
            .await
            .unwrap();
        (SqliteMessageRepository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_save_and_read_back_meta() {
        let (repo, _dir) = test_repo().await;
        let record = ChatRecord::new(
            "order-1",
            "THOR",
            "Ok.",
            serde_json::json!({"source": "schumacher"}),
        );

        repo.save_message(&record).await.unwrap();

        let history = repo.recent_messages("order-1", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, record.id);
        assert_eq!(history[0].meta["source"], "schumacher");
        assert_eq!(format_datetime(&history[0].ts), format_datetime(&record.ts));
    }

    #[tokio::test]
    async fn test_recent_messages_newest_first_with_limit() {
        let (repo, _dir) = test_repo().await;
        let base = Utc::now();
        for i in 0..5 {
            let mut record = ChatRecord::new("r", "cliente", format!("msg {i}"), serde_json::json!({}));
            record.ts = base + Duration::seconds(i);
            repo.save_message(&record).await.unwrap();
        }
        repo.save_message(&ChatRecord::new("other", "x", "noise", serde_json::json!({})))
            .await
            .unwrap();

        let history = repo.recent_messages("r", 3).await.unwrap();
        let texts: Vec<&str> = history.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["msg 4", "msg 3", "msg 2"]);
        assert_eq!(repo.count_messages().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_unknown_room_is_empty() {
        let (repo, _dir) = test_repo().await;
        assert!(repo.recent_messages("nobody", 200).await.unwrap().is_empty());
    }
}
