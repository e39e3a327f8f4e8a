//! Telegram Bot API wire types (the subset this engine consumes).

use serde::Deserialize;

/// The Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One entry from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

/// The chat a message arrived from.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
