//! HTTP client for the Telegram Bot API.

use std::time::Duration;

use crate::types::{ApiResponse, Update};

/// Server-side long-poll wait for `getUpdates`, in seconds.
const LONG_POLL_TIMEOUT_SECS: u64 = 20;

/// Client-side request timeout. Must exceed the long-poll wait.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default API host; overridable for tests and self-hosted relays.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Errors from the chat transport.
///
/// Always caught at the per-recipient or per-verify call site, logged,
/// and never allowed to abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The remote API was unreachable or the payload was malformed.
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with `ok = false`.
    #[error("Telegram API error: {0}")]
    Api(String),
}

/// Thin client over the three Bot API calls the engine uses.
///
/// The bot token is a per-call argument because it lives in the mutable
/// `bot_settings` row, not in process configuration.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
}

impl Default for TelegramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TelegramClient {
    /// Create a client against the public Bot API host.
    pub fn new() -> Self {
        Self::with_api_base(
            std::env::var("TELEGRAM_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into()),
        )
    }

    /// Create a client against a custom API base URL.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("reqwest client builder accepts static configuration");

        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn method_url(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{bot_token}/{method}", self.api_base)
    }

    /// Long-poll for updates with id >= `offset`.
    ///
    /// Returns an empty list when the server-side wait times out.
    /// Callers must not advance their cursor when this fails.
    pub async fn get_updates(
        &self,
        bot_token: &str,
        offset: i64,
    ) -> Result<Vec<Update>, TransportError> {
        let resp = self
            .client
            .get(self.method_url(bot_token, "getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_TIMEOUT_SECS.to_string()),
            ])
            .send()
            .await?;

        let body: ApiResponse<Vec<Update>> = resp.json().await?;
        if !body.ok {
            return Err(TransportError::Api(body.description.unwrap_or_default()));
        }

        Ok(body.result.unwrap_or_default())
    }

    /// Send a Markdown text message, falling back to plain text when
    /// Telegram rejects the formatting.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        let markdown = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        if self.post_message(bot_token, "sendMessage", &markdown).await? {
            return Ok(());
        }

        tracing::debug!(chat_id, "Markdown send rejected, retrying as plain text");
        let plain = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if self.post_message(bot_token, "sendMessage", &plain).await? {
            return Ok(());
        }

        Err(TransportError::Api("sendMessage rejected".into()))
    }

    /// Send a photo by URL.
    pub async fn send_photo(
        &self,
        bot_token: &str,
        chat_id: i64,
        photo_url: &str,
    ) -> Result<(), TransportError> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "photo": photo_url,
        });

        if self.post_message(bot_token, "sendPhoto", &payload).await? {
            return Ok(());
        }

        Err(TransportError::Api(format!(
            "sendPhoto rejected for {photo_url}"
        )))
    }

    /// POST a payload, returning whether the API accepted it.
    async fn post_message(
        &self,
        bot_token: &str,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<bool, TransportError> {
        let resp = self
            .client
            .post(self.method_url(bot_token, method))
            .json(payload)
            .send()
            .await?;

        let body: ApiResponse<serde_json::Value> = resp.json().await?;
        if !body.ok {
            tracing::debug!(
                method,
                description = body.description.as_deref().unwrap_or(""),
                "Telegram API rejected the call"
            );
        }
        Ok(body.ok)
    }
}
