//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the HTTP/WebSocket server. Services are generic over repository, provider,
//! store, and connection traits; AppState pins them to the infra
//! implementations and the axum WebSocket adapter.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use guriri_core::assistant::gate::AssistantGate;
use guriri_core::chat::service::ChatService;
use guriri_core::room::registry::RoomRegistry;
use guriri_core::service::live_doc::LiveDocService;
use guriri_core::service::order::OrderService;
use guriri_infra::completion::ollama::OllamaProvider;
use guriri_infra::config::ensure_directories;
use guriri_infra::sqlite::message::SqliteMessageRepository;
use guriri_infra::sqlite::order::SqliteOrderRepository;
use guriri_infra::sqlite::pool::DatabasePool;
use guriri_infra::storage::filesystem::LocalLiveDocStore;
use guriri_types::config::DispatchConfig;

use crate::http::ws_connection::WsConnection;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteMessageRepository, OllamaProvider, WsConnection>;

pub type ConcreteOrderService = OrderService<SqliteOrderRepository, WsConnection>;

pub type ConcreteLiveDocService =
    LiveDocService<LocalLiveDocStore, SqliteMessageRepository, WsConnection>;

/// Shared application state holding all services.
///
/// The room registry and assistant gate live inside the chat service; the
/// order and live-doc services share the same registry.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub order_service: Arc<ConcreteOrderService>,
    pub live_doc_service: Arc<ConcreteLiveDocService>,
    pub config: Arc<DispatchConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: create directories, open the
    /// database, and wire services.
    pub async fn init(config: DispatchConfig) -> anyhow::Result<Self> {
        ensure_directories(&config).await?;

        let db_pool = DatabasePool::open(&config.database_path()).await?;

        let provider = OllamaProvider::new(
            &config.ollama_host,
            &config.ollama_model,
            config.completion_timeout,
        )?;

        let registry = Arc::new(RoomRegistry::new());
        let gate = Arc::new(AssistantGate::new(
            SecretString::from(config.admin_token.expose_secret().to_string()),
            config.privileged_room.clone(),
        ));
        let messages = Arc::new(SqliteMessageRepository::new(db_pool.clone()));
        let orders = Arc::new(SqliteOrderRepository::new(db_pool.clone()));
        let store = Arc::new(LocalLiveDocStore::new(config.upload_dir()));

        let chat_service = ChatService::new(
            Arc::clone(&registry),
            gate,
            Arc::clone(&messages),
            Arc::new(provider),
            config.completion_timeout,
            config.max_tokens,
        );
        let order_service = OrderService::new(orders, Arc::clone(&registry));
        let live_doc_service = LiveDocService::new(store, messages, registry);

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            model = %config.ollama_model,
            "Application state initialized"
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            order_service: Arc::new(order_service),
            live_doc_service: Arc::new(live_doc_service),
            config: Arc::new(config),
            db_pool,
        })
    }
}
