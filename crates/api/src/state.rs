use std::sync::Arc;

use agenda_notify::{LinkHandshake, NotificationEngine};
use agenda_telegram::TelegramClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: agenda_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Notification engine (reminder and digest sweeps).
    pub engine: Arc<NotificationEngine<TelegramClient>>,
    /// Telegram link handshake resolver.
    pub handshake: Arc<LinkHandshake<TelegramClient>>,
}
