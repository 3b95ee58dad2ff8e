//! ChatService -- per-frame chat pipeline and assistant replies.
//!
//! For every inbound frame, in order: persist the chat record, broadcast it
//! to the room, apply a `/thor` command if present, and spawn an assistant
//! reply when assistant mode is active. The reply task owns its inputs, so it
//! survives the originating connection closing.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use guriri_types::assistant::{ModeChange, ModeOrigin};
use guriri_types::completion::CompletionRequest;
use guriri_types::error::{GateError, RepositoryError};
use guriri_types::event::{ChatPayload, OutboundEvent, RoomEvent, THOR_DENIED_NOTICE};
use guriri_types::inbound::{ChatLine, InboundFrame};
use guriri_types::message::{ASSISTANT_SENDER, ChatRecord};

use crate::assistant::command::AssistantCommand;
use crate::assistant::gate::AssistantGate;
use crate::assistant::prompt::{FALLBACK_REPLY, build_prompt};
use crate::completion::provider::CompletionProvider;
use crate::repository::message::MessageRepository;
use crate::room::connection::RoomConnection;
use crate::room::registry::RoomRegistry;

/// Upper bound on a single history page.
pub const MAX_HISTORY_LIMIT: i64 = 1000;

/// What happened while handling one inbound frame.
#[derive(Debug)]
pub struct InboundOutcome {
    /// The command found in the text, if any.
    pub command: Option<AssistantCommand>,
    /// `Some(Ok)` when a command was applied, `Some(Err)` when it was denied.
    pub command_result: Option<Result<bool, GateError>>,
    /// Handle of the spawned assistant reply, if one was started.
    pub reply: Option<JoinHandle<()>>,
}

/// Orchestrates chat persistence, fan-out, and assistant replies.
pub struct ChatService<M, P, C>
where
    M: MessageRepository,
    P: CompletionProvider,
    C: RoomConnection,
{
    registry: Arc<RoomRegistry<C>>,
    gate: Arc<AssistantGate>,
    messages: Arc<M>,
    provider: Arc<P>,
    completion_timeout: Duration,
    max_tokens: u32,
}

impl<M, P, C> ChatService<M, P, C>
where
    M: MessageRepository,
    P: CompletionProvider,
    C: RoomConnection,
{
    pub fn new(
        registry: Arc<RoomRegistry<C>>,
        gate: Arc<AssistantGate>,
        messages: Arc<M>,
        provider: Arc<P>,
        completion_timeout: Duration,
        max_tokens: u32,
    ) -> Self {
        Self {
            registry,
            gate,
            messages,
            provider,
            completion_timeout,
            max_tokens,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry<C>> {
        &self.registry
    }

    pub fn gate(&self) -> &AssistantGate {
        &self.gate
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run the per-frame pipeline for one received text frame.
    pub async fn handle_inbound(self: &Arc<Self>, room: &str, raw: &str) -> InboundOutcome {
        let line = InboundFrame::parse(raw).into_chat_line();

        let record = ChatRecord::new(room, &line.sender, &line.text, line.meta.clone());
        if let Err(err) = self.messages.save_message(&record).await {
            warn!(room, sender = %line.sender, error = %err, "Failed to persist chat record");
        }

        let chat = OutboundEvent::at(
            RoomEvent::Chat(ChatPayload {
                from: line.sender.clone(),
                text: line.text.clone(),
                meta: Some(line.meta.clone()),
            }),
            record.ts,
        );
        self.registry.broadcast(room, &chat).await;

        let command = AssistantCommand::parse(&line.text);
        let command_result = match command {
            Some(command) => Some(self.apply_command(room, &line, command).await),
            None => None,
        };

        let reply = self.gate.is_active().then(|| {
            let service = Arc::clone(self);
            let room = room.to_string();
            tokio::spawn(async move {
                service.reply_as_assistant(&room, &line.sender, &line.text).await;
            })
        });

        InboundOutcome {
            command,
            command_result,
            reply,
        }
    }

    /// Switch assistant mode and announce the change to every room.
    pub async fn set_assistant_mode(
        &self,
        active: bool,
        origin: ModeOrigin<'_>,
        credential: Option<&str>,
    ) -> Result<bool, GateError> {
        let previous = self.gate.set_mode(active, origin, credential)?;
        let change = ModeChange {
            assume: active,
            by: origin.actor().map(str::to_string),
        };
        self.registry
            .broadcast_all(&OutboundEvent::now(RoomEvent::SchumacherMode(change)))
            .await;
        Ok(previous)
    }

    /// Ask the completion backend for a reply, then persist and broadcast it.
    ///
    /// Never fails: a timeout or backend error yields the fallback text.
    pub async fn reply_as_assistant(&self, room: &str, sender: &str, text: &str) -> String {
        let request = CompletionRequest {
            prompt: build_prompt(room, sender, text),
            max_tokens: self.max_tokens,
        };

        let reply = match tokio::time::timeout(
            self.completion_timeout,
            self.provider.complete(&request),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                warn!(room, provider = self.provider.name(), error = %err, "Completion failed");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(
                    room,
                    provider = self.provider.name(),
                    timeout_ms = self.completion_timeout.as_millis() as u64,
                    "Completion timed out"
                );
                FALLBACK_REPLY.to_string()
            }
        };

        let record = ChatRecord::new(
            room,
            ASSISTANT_SENDER,
            &reply,
            serde_json::json!({"source": "schumacher"}),
        );
        if let Err(err) = self.messages.save_message(&record).await {
            warn!(room, error = %err, "Failed to persist assistant reply");
        }

        let event = OutboundEvent::at(
            RoomEvent::Chat(ChatPayload {
                from: ASSISTANT_SENDER.to_string(),
                text: reply.clone(),
                meta: None,
            }),
            record.ts,
        );
        let report = self.registry.broadcast(room, &event).await;
        debug!(room, delivered = report.delivered, "Assistant reply broadcast");
        reply
    }

    /// Recent chat records for a room, newest first.
    ///
    /// `limit` is capped at [`MAX_HISTORY_LIMIT`]; zero or a negative limit
    /// yields no records.
    pub async fn history(&self, room: &str, limit: i64) -> Result<Vec<ChatRecord>, RepositoryError> {
        self.messages
            .recent_messages(room, limit.clamp(0, MAX_HISTORY_LIMIT))
            .await
    }

    /// Total persisted chat records.
    pub async fn message_count(&self) -> Result<i64, RepositoryError> {
        self.messages.count_messages().await
    }

    async fn apply_command(
        &self,
        room: &str,
        line: &ChatLine,
        command: AssistantCommand,
    ) -> Result<bool, GateError> {
        let origin = ModeOrigin::Room {
            room,
            sender: &line.sender,
        };
        let result = self
            .set_assistant_mode(command.activates(), origin, line.admin_token())
            .await;

        match &result {
            Ok(_) => info!(room, sender = %line.sender, ?command, "In-band assistant command applied"),
            Err(_) => {
                self.registry
                    .broadcast(
                        room,
                        &OutboundEvent::now(RoomEvent::System(THOR_DENIED_NOTICE.to_string())),
                    )
                    .await;
            }
        }
        result
    }
}
