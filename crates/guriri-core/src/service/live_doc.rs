//! Courier live-doc intake.
//!
//! Uploads are stored under a collision-resistant name
//! `{order_id}_{motoboy}_{unix_secs}_{8 hex}_{file name}`, recorded as a chat
//! line in the order's room, and announced there as `live_doc_uploaded`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use guriri_types::error::StorageError;
use guriri_types::event::{OutboundEvent, RoomEvent};
use guriri_types::live_doc::{LiveDocFile, LiveDocMeta, LiveDocUpload};
use guriri_types::message::ChatRecord;

use crate::repository::message::MessageRepository;
use crate::room::connection::RoomConnection;
use crate::room::registry::RoomRegistry;
use crate::storage::live_doc_store::LiveDocStore;

const FALLBACK_FILE_NAME: &str = "upload";

pub struct LiveDocService<S, M, C>
where
    S: LiveDocStore,
    M: MessageRepository,
    C: RoomConnection,
{
    store: Arc<S>,
    messages: Arc<M>,
    registry: Arc<RoomRegistry<C>>,
}

impl<S, M, C> LiveDocService<S, M, C>
where
    S: LiveDocStore,
    M: MessageRepository,
    C: RoomConnection,
{
    pub fn new(store: Arc<S>, messages: Arc<M>, registry: Arc<RoomRegistry<C>>) -> Self {
        Self {
            store,
            messages,
            registry,
        }
    }

    /// Store an upload, record it in the order room, and announce it.
    ///
    /// A store failure is returned. A failure to record the chat line is
    /// logged and the upload still succeeds.
    pub async fn upload(&self, upload: LiveDocUpload) -> Result<LiveDocMeta, StorageError> {
        let order_id = upload.order_id.trim();
        let motoboy = upload.motoboy.trim();
        if order_id.is_empty() {
            return Err(StorageError::InvalidInput("order_id is required".into()));
        }
        if motoboy.is_empty() {
            return Err(StorageError::InvalidInput("motoboy is required".into()));
        }

        let now = Utc::now();
        let display_name = sanitize_file_name(&upload.file_name);
        let stored_name = format!(
            "{}_{}_{}_{}_{}",
            sanitize_file_name(order_id),
            sanitize_file_name(motoboy),
            now.timestamp(),
            &Uuid::new_v4().simple().to_string()[..8],
            display_name
        );

        let path = self.store.store(&stored_name, &upload.content).await?;

        let meta = LiveDocMeta {
            order_id: order_id.to_string(),
            motoboy: motoboy.to_string(),
            path,
            lat: upload.lat,
            lon: upload.lon,
            ts: now,
        };

        match serde_json::to_value(&meta) {
            Ok(meta_json) => {
                let record = ChatRecord::new(
                    order_id,
                    motoboy,
                    format!("LiveDoc uploaded: {stored_name}"),
                    meta_json,
                );
                if let Err(err) = self.messages.save_message(&record).await {
                    warn!(order_id, error = %err, "Failed to record live doc upload");
                }
            }
            Err(err) => warn!(order_id, error = %err, "Failed to encode live doc metadata"),
        }

        let report = self
            .registry
            .broadcast(
                order_id,
                &OutboundEvent::at(RoomEvent::LiveDocUploaded(meta.clone()), now),
            )
            .await;
        info!(
            order_id,
            motoboy,
            bytes = upload.content.len(),
            delivered = report.delivered,
            "Live doc stored"
        );
        Ok(meta)
    }

    /// First stored upload whose name contains `client_id`.
    pub async fn find_for_client(&self, client_id: &str) -> Result<LiveDocFile, StorageError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(StorageError::InvalidInput("client id is required".into()));
        }
        self.store.find_first_matching(client_id).await
    }
}

/// Reduce a client-supplied name to a single safe path component.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryDocStore, InMemoryMessages, RecordingConnection};

    struct Harness {
        service: LiveDocService<InMemoryDocStore, InMemoryMessages, RecordingConnection>,
        store: Arc<InMemoryDocStore>,
        messages: Arc<InMemoryMessages>,
        registry: Arc<RoomRegistry<RecordingConnection>>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryDocStore::default());
        let messages = Arc::new(InMemoryMessages::default());
        let registry = Arc::new(RoomRegistry::new());
        Harness {
            service: LiveDocService::new(store.clone(), messages.clone(), registry.clone()),
            store,
            messages,
            registry,
        }
    }

    fn upload(order_id: &str, file_name: &str) -> LiveDocUpload {
        LiveDocUpload {
            order_id: order_id.into(),
            motoboy: "joao".into(),
            file_name: file_name.into(),
            content: b"%PDF-1.4".to_vec(),
            lat: Some("-19.9".into()),
            lon: None,
        }
    }

    #[tokio::test]
    async fn test_upload_is_stored_recorded_and_announced_to_order_room() {
        let h = harness();
        let order_room = RecordingConnection::new();
        let other_room = RecordingConnection::new();
        h.registry.admit("1700000000000", order_room.clone()).await;
        h.registry.admit("central", other_room.clone()).await;
        other_room.clear();

        let meta = h
            .service
            .upload(upload("1700000000000", "comprovante.pdf"))
            .await
            .unwrap();

        let names = h.store.names();
        assert_eq!(names.len(), 1);
        let parts: Vec<&str> = names[0].splitn(5, '_').collect();
        assert_eq!(parts[0], "1700000000000");
        assert_eq!(parts[1], "joao");
        assert!(parts[2].parse::<i64>().is_ok());
        assert_eq!(parts[3].len(), 8);
        assert_eq!(parts[4], "comprovante.pdf");
        assert_eq!(meta.path, format!("mem://{}", names[0]));

        let records = h.messages.all();
        assert_eq!(records[0].room, "1700000000000");
        assert_eq!(records[0].sender, "joao");
        assert_eq!(records[0].text, format!("LiveDoc uploaded: {}", names[0]));
        assert_eq!(records[0].meta["lat"], "-19.9");
        assert!(records[0].meta["lon"].is_null());

        let events = order_room.of_type("live_doc_uploaded");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["payload"]["motoboy"], "joao");
        assert!(other_room.frames().is_empty());
    }

    #[tokio::test]
    async fn test_record_failure_does_not_fail_upload() {
        let h = harness();
        h.messages.fail_writes();
        assert!(h.service.upload(upload("42", "a.jpg")).await.is_ok());
        assert_eq!(h.store.names().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_identifiers_are_rejected() {
        let h = harness();
        let err = h.service.upload(upload("  ", "a.jpg")).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
        assert!(h.store.names().is_empty());
    }

    #[tokio::test]
    async fn test_find_for_client_returns_first_match_by_name() {
        let h = harness();
        h.service.upload(upload("200", "b.pdf")).await.unwrap();
        h.service.upload(upload("100", "a.pdf")).await.unwrap();

        let found = h.service.find_for_client("joao").await.unwrap();
        assert!(found.file_name.starts_with("100_"));

        let missing = h.service.find_for_client("maria").await.unwrap_err();
        assert!(matches!(missing, StorageError::NotFound(_)));
    }

    #[test]
    fn test_sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\fotos\\nota fiscal.png"), "nota_fiscal.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("ok-name_1.jpg"), "ok-name_1.jpg");
    }
}
