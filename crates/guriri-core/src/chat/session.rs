//! Per-connection chat session lifecycle.
//!
//! `Connecting -> Open -> Closed`. A session is admitted to its room, then
//! drives the inbound stream one frame at a time through
//! [`ChatService::handle_inbound`]. When the stream ends or errors, the
//! connection is removed and a `left:<room>` notice goes to every room.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, info, warn};

use guriri_types::error::TransportError;
use guriri_types::event::{OutboundEvent, RoomEvent};
use guriri_types::room::ConnectionId;

use crate::completion::provider::CompletionProvider;
use crate::repository::message::MessageRepository;
use crate::room::connection::RoomConnection;

use super::service::ChatService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// Why the receive loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed or the stream ended.
    Disconnected,
    /// The transport reported a receive failure.
    ReceiveError(String),
}

/// Counters for a finished session, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub connection_id: ConnectionId,
    pub frames: u64,
    pub commands: u64,
    pub replies_spawned: u64,
    pub reason: CloseReason,
}

/// One accepted connection bound to one room.
pub struct ChatSession<M, P, C>
where
    M: MessageRepository,
    P: CompletionProvider,
    C: RoomConnection,
{
    service: Arc<ChatService<M, P, C>>,
    room: String,
    connection: Arc<C>,
    state: SessionState,
}

impl<M, P, C> ChatSession<M, P, C>
where
    M: MessageRepository,
    P: CompletionProvider,
    C: RoomConnection,
{
    pub fn new(service: Arc<ChatService<M, P, C>>, room: impl Into<String>, connection: Arc<C>) -> Self {
        Self {
            service,
            room: room.into(),
            connection,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Admit the connection and process inbound frames until the stream ends.
    ///
    /// Never fails; transport errors end the session and are logged.
    pub async fn run<S>(mut self, mut inbound: S) -> SessionSummary
    where
        S: Stream<Item = Result<String, TransportError>> + Send + Unpin,
    {
        let connection_id = self.connection.id();
        let registry = Arc::clone(self.service.registry());

        registry.admit(&self.room, Arc::clone(&self.connection)).await;
        self.state = SessionState::Open;

        let mut summary = SessionSummary {
            connection_id,
            frames: 0,
            commands: 0,
            replies_spawned: 0,
            reason: CloseReason::Disconnected,
        };

        while let Some(item) = inbound.next().await {
            match item {
                Ok(raw) => {
                    summary.frames += 1;
                    let outcome = self.service.handle_inbound(&self.room, &raw).await;
                    if outcome.command.is_some() {
                        summary.commands += 1;
                    }
                    if outcome.reply.is_some() {
                        summary.replies_spawned += 1;
                    }
                }
                Err(err) => {
                    warn!(room = %self.room, %connection_id, error = %err, "Receive failed, closing session");
                    summary.reason = CloseReason::ReceiveError(err.to_string());
                    break;
                }
            }
        }

        self.state = SessionState::Closed;
        if !registry.remove(&self.room, connection_id) {
            debug!(room = %self.room, %connection_id, "Connection already dropped by fan-out");
        }
        registry
            .broadcast_all(&OutboundEvent::now(RoomEvent::left(&self.room)))
            .await;

        info!(
            room = %self.room,
            %connection_id,
            frames = summary.frames,
            replies = summary.replies_spawned,
            "Session closed"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures_util::stream::{self, BoxStream};
    use secrecy::SecretString;
    use tokio::sync::mpsc;

    use guriri_types::assistant::ModeOrigin;
    use guriri_types::message::ASSISTANT_SENDER;

    use crate::assistant::gate::AssistantGate;
    use crate::assistant::prompt::FALLBACK_REPLY;
    use crate::room::registry::RoomRegistry;
    use crate::test_support::{InMemoryMessages, RecordingConnection, ScriptedCompletion};

    type TestService = ChatService<InMemoryMessages, ScriptedCompletion, RecordingConnection>;
    type Inbound = Result<String, TransportError>;

    fn service_with(provider: ScriptedCompletion) -> Arc<TestService> {
        Arc::new(ChatService::new(
            Arc::new(RoomRegistry::new()),
            Arc::new(AssistantGate::new(SecretString::from("k".to_string()), "central")),
            Arc::new(InMemoryMessages::default()),
            Arc::new(provider),
            Duration::from_secs(5),
            512,
        ))
    }

    fn service() -> Arc<TestService> {
        service_with(ScriptedCompletion::replying("ok"))
    }

    /// Inbound stream that stays open until the sender is dropped.
    fn open_stream() -> (mpsc::UnboundedSender<Inbound>, BoxStream<'static, Inbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inbound = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed();
        (tx, inbound)
    }

    fn chat_from(sender: &str, text: &str) -> Inbound {
        Ok(serde_json::json!({"payload": {"from": sender, "text": text}}).to_string())
    }

    fn thor_chats(conn: &RecordingConnection) -> Vec<serde_json::Value> {
        conn.of_type("chat")
            .into_iter()
            .filter(|c| c["payload"]["from"] == ASSISTANT_SENDER)
            .collect()
    }

    /// Let spawned tasks run until `done` holds.
    async fn settle(done: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition not reached");
    }

    fn frames(items: Vec<Result<&str, TransportError>>) -> impl Stream<Item = Result<String, TransportError>> + Send + Unpin {
        stream::iter(
            items
                .into_iter()
                .map(|r| r.map(str::to_string))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_session_joins_processes_and_leaves() {
        let service = service();
        let watcher = RecordingConnection::new();
        service.registry().admit("order-1", watcher.clone()).await;
        watcher.clear();

        let conn = RecordingConnection::new();
        let session = ChatSession::new(service.clone(), "order-1", conn.clone());
        assert_eq!(session.state(), SessionState::Connecting);

        let summary = session
            .run(frames(vec![Ok("one"), Ok("two"), Ok("/thor on")]))
            .await;

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.commands, 1);
        assert_eq!(summary.reason, CloseReason::Disconnected);

        let system: Vec<_> = watcher
            .of_type("system")
            .into_iter()
            .map(|f| f["payload"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            system,
            vec!["join:order-1", "/thor denied: not admin", "left:order-1"]
        );
        assert_eq!(watcher.of_type("chat").len(), 3);
        assert_eq!(service.registry().connection_count("order-1"), 1);
    }

    #[tokio::test]
    async fn test_last_member_leaving_deletes_room() {
        let service = service();
        let conn = RecordingConnection::new();

        ChatSession::new(service.clone(), "order-2", conn.clone())
            .run(frames(vec![Ok("bye")]))
            .await;

        assert!(!service.registry().contains_room("order-2"));
    }

    #[tokio::test]
    async fn test_left_notice_reaches_other_rooms() {
        let service = service();
        let elsewhere = RecordingConnection::new();
        service.registry().admit("central", elsewhere.clone()).await;
        elsewhere.clear();

        ChatSession::new(service.clone(), "order-3", RecordingConnection::new())
            .run(frames(vec![]))
            .await;

        let system = elsewhere.of_type("system");
        assert_eq!(system.len(), 1);
        assert_eq!(system[0]["payload"], "left:order-3");
    }

    #[tokio::test]
    async fn test_receive_error_closes_session_and_stops_processing() {
        let service = service();
        let conn = RecordingConnection::new();

        let summary = ChatSession::new(service.clone(), "r", conn)
            .run(frames(vec![
                Ok("first"),
                Err(TransportError::Receive("reset".into())),
                Ok("never seen"),
            ]))
            .await;

        assert_eq!(summary.frames, 1);
        assert!(matches!(summary.reason, CloseReason::ReceiveError(_)));
        assert_eq!(service.history("r", 10).await.unwrap().len(), 1);
        assert!(!service.registry().contains_room("r"));
    }

    #[tokio::test]
    async fn test_frames_from_one_connection_are_processed_in_order() {
        let service = service();
        let watcher = RecordingConnection::new();
        service.registry().admit("r", watcher.clone()).await;

        ChatSession::new(service.clone(), "r", RecordingConnection::new())
            .run(frames(vec![Ok("a"), Ok("b"), Ok("c")]))
            .await;

        let texts: Vec<_> = watcher
            .of_type("chat")
            .into_iter()
            .map(|f| f["payload"]["text"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_two_members_of_an_order_room_see_each_other_and_history_keeps_it() {
        let service = service();

        let y = RecordingConnection::new();
        let (y_tx, y_inbound) = open_stream();
        let y_session = tokio::spawn(
            ChatSession::new(service.clone(), "order-42", y.clone()).run(y_inbound),
        );
        settle(|| service.registry().connection_count("order-42") == 1).await;

        let x = RecordingConnection::new();
        let summary = ChatSession::new(service.clone(), "order-42", x.clone())
            .run(stream::iter(vec![chat_from("cliente", "oi")]))
            .await;
        assert_eq!(summary.frames, 1);

        let chats = y.of_type("chat");
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0]["payload"]["from"], "cliente");
        assert_eq!(chats[0]["payload"]["text"], "oi");
        assert_eq!(x.of_type("chat").len(), 1);

        let history = service.history("order-42", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, "cliente");
        assert_eq!(history[0].text, "oi");

        drop(y_tx);
        y_session.await.unwrap();
        assert!(!service.registry().contains_room("order-42"));
    }

    #[tokio::test]
    async fn test_assistant_replies_only_after_central_turns_it_on() {
        let service = service();
        let watcher = RecordingConnection::new();
        service.registry().admit("central", watcher.clone()).await;
        watcher.clear();

        let (tx, inbound) = open_stream();
        let session = tokio::spawn(
            ChatSession::new(service.clone(), "central", RecordingConnection::new()).run(inbound),
        );

        tx.send(chat_from("ops", "bom dia")).unwrap();
        settle(|| watcher.of_type("chat").len() == 1).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!service.gate().is_active());
        assert!(thor_chats(&watcher).is_empty());
        assert!(service.provider().prompts().is_empty());

        tx.send(chat_from("ops", "/thor on")).unwrap();
        settle(|| thor_chats(&watcher).len() == 1).await;
        assert!(service.gate().is_active());
        assert_eq!(watcher.of_type("schumacher_mode").len(), 1);

        tx.send(chat_from("cliente", "cadê meu pedido?")).unwrap();
        settle(|| thor_chats(&watcher).len() == 2).await;

        drop(tx);
        let summary = session.await.unwrap();
        assert_eq!(summary.replies_spawned, 2);
        assert_eq!(thor_chats(&watcher).len(), 2);
        let prompts = service.provider().prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("Message: cadê meu pedido?"));
    }

    #[tokio::test]
    async fn test_failing_backend_gives_exactly_one_fallback_per_message() {
        let service = service_with(ScriptedCompletion::failing("connection refused"));
        service
            .set_assistant_mode(true, ModeOrigin::Http, Some("k"))
            .await
            .unwrap();
        let watcher = RecordingConnection::new();
        service.registry().admit("order-9", watcher.clone()).await;

        let summary = ChatSession::new(service.clone(), "order-9", RecordingConnection::new())
            .run(stream::iter(vec![chat_from("cliente", "oi")]))
            .await;
        assert_eq!(summary.replies_spawned, 1);

        settle(|| !thor_chats(&watcher).is_empty()).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let replies = thor_chats(&watcher);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["payload"]["text"], FALLBACK_REPLY);
    }
}
