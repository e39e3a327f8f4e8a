//! Chat transport seam.
//!
//! The dispatchers talk to an abstract transport so delivery logic can be
//! exercised against a recording mock; production wires in
//! [`TelegramClient`].

use agenda_telegram::{TelegramClient, TransportError, Update};
use async_trait::async_trait;

/// The three remote operations the engine needs from a chat service.
///
/// Delivery is fire-and-forget: sending the same message twice produces
/// two messages, so idempotency lives in the persisted markers, never in
/// the transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Long-poll for updates with id >= `offset`. Implementations must
    /// bound the wait; callers must not advance their cursor on failure.
    async fn fetch_updates(
        &self,
        bot_token: &str,
        offset: i64,
    ) -> Result<Vec<Update>, TransportError>;

    /// Send a text message to a chat.
    async fn send_message(
        &self,
        bot_token: &str,
        chat_id: i64,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Send a photo by URL to a chat.
    async fn send_photo(
        &self,
        bot_token: &str,
        chat_id: i64,
        photo_url: &str,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn fetch_updates(
        &self,
        bot_token: &str,
        offset: i64,
    ) -> Result<Vec<Update>, TransportError> {
        self.get_updates(bot_token, offset).await
    }

    async fn send_message(
        &self,
        bot_token: &str,
        chat_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        TelegramClient::send_message(self, bot_token, chat_id, text).await
    }

    async fn send_photo(
        &self,
        bot_token: &str,
        chat_id: i64,
        photo_url: &str,
    ) -> Result<(), TransportError> {
        TelegramClient::send_photo(self, bot_token, chat_id, photo_url).await
    }
}
