//! In-memory fakes for the core ports.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use guriri_types::completion::CompletionRequest;
use guriri_types::error::{CompletionError, RepositoryError, StorageError, TransportError};
use guriri_types::live_doc::LiveDocFile;
use guriri_types::message::ChatRecord;
use guriri_types::order::Order;
use guriri_types::room::ConnectionId;

use crate::completion::provider::CompletionProvider;
use crate::repository::message::MessageRepository;
use crate::repository::order::OrderRepository;
use crate::room::connection::RoomConnection;
use crate::storage::live_doc_store::LiveDocStore;

/// Connection that records every frame and can be told to start failing
/// or to stop completing sends altogether.
pub struct RecordingConnection {
    id: ConnectionId,
    frames: Mutex<Vec<String>>,
    failing: AtomicBool,
    stalled: AtomicBool,
}

impl RecordingConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(),
            frames: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
        })
    }

    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Every later send never completes, like a peer that stopped reading.
    pub fn stall_sends(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    pub fn frames_json(&self) -> Vec<serde_json::Value> {
        self.frames()
            .iter()
            .map(|f| serde_json::from_str(f).unwrap())
            .collect()
    }

    /// Frames of a single event type.
    pub fn of_type(&self, kind: &str) -> Vec<serde_json::Value> {
        self.frames_json()
            .into_iter()
            .filter(|f| f["type"] == kind)
            .collect()
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }
}

impl RoomConnection for RecordingConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, frame: &str) -> Result<(), TransportError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.frames.lock().unwrap().push(frame.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessages {
    records: Mutex<Vec<ChatRecord>>,
    failing: AtomicBool,
}

impl InMemoryMessages {
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<ChatRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl MessageRepository for InMemoryMessages {
    async fn save_message(&self, record: &ChatRecord) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk full".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        room: &str,
        limit: i64,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.room == room)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_messages(&self) -> Result<i64, RepositoryError> {
        Ok(self.records.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryOrders {
    orders: Mutex<Vec<Order>>,
    failing: AtomicBool,
}

impl InMemoryOrders {
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

impl OrderRepository for InMemoryOrders {
    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.id == order.id) {
            return Err(RepositoryError::Conflict(order.id.clone()));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn count_orders(&self) -> Result<i64, RepositoryError> {
        Ok(self.orders.lock().unwrap().len() as i64)
    }
}

/// Completion fake that replies with fixed text, optionally after a delay.
pub struct ScriptedCompletion {
    reply: Result<String, String>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().map_err(CompletionError::Http)
    }
}

#[derive(Default)]
pub struct InMemoryDocStore {
    files: Mutex<Vec<LiveDocFile>>,
}

impl InMemoryDocStore {
    pub fn names(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.file_name.clone())
            .collect()
    }
}

impl LiveDocStore for InMemoryDocStore {
    async fn store(&self, file_name: &str, content: &[u8]) -> Result<String, StorageError> {
        self.files.lock().unwrap().push(LiveDocFile {
            file_name: file_name.to_string(),
            content: content.to_vec(),
        });
        Ok(format!("mem://{file_name}"))
    }

    async fn find_first_matching(&self, needle: &str) -> Result<LiveDocFile, StorageError> {
        let mut files = self.files.lock().unwrap().clone();
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        files
            .into_iter()
            .find(|f| f.file_name.contains(needle))
            .ok_or_else(|| StorageError::NotFound(needle.to_string()))
    }
}
