//! Shared fixtures for the dispatcher integration tests: a recording
//! chat transport and seed helpers for users, events, and the bot row.

use std::sync::Mutex;

use agenda_core::types::{DbId, Timestamp};
use agenda_notify::ChatTransport;
use agenda_telegram::{TransportError, Update};
use async_trait::async_trait;
use sqlx::PgPool;

/// One outbound call captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message { chat_id: i64, text: String },
    Photo { chat_id: i64, url: String },
}

/// In-memory transport that records sends and replays canned updates.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub updates: Mutex<Vec<Update>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn fetch_updates(
        &self,
        _bot_token: &str,
        offset: i64,
    ) -> Result<Vec<Update>, TransportError> {
        let updates = self.updates.lock().unwrap();
        Ok(updates
            .iter()
            .filter(|u| u.update_id >= offset)
            .cloned()
            .collect())
    }

    async fn send_message(
        &self,
        _bot_token: &str,
        chat_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        _bot_token: &str,
        chat_id: i64,
        photo_url: &str,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            url: photo_url.to_string(),
        });
        Ok(())
    }
}

pub fn utc(s: &str) -> Timestamp {
    s.parse().expect("valid RFC 3339 timestamp")
}

pub async fn set_bot_token(pool: &PgPool, token: &str) {
    sqlx::query("UPDATE bot_settings SET bot_token = $1 WHERE id = 1")
        .bind(token)
        .execute(pool)
        .await
        .expect("set bot token");
}

pub async fn insert_user(pool: &PgPool, email: &str, chat_id: Option<i64>) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (email, telegram_chat_id, daily_notifications_enabled) \
         VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind(email)
    .bind(chat_id)
    .fetch_one(pool)
    .await
    .expect("insert user")
}

pub async fn insert_event(pool: &PgPool, title: &str, start: Timestamp) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO events (title, start_time) VALUES ($1, $2) RETURNING id",
    )
    .bind(title)
    .bind(start)
    .fetch_one(pool)
    .await
    .expect("insert event")
}
