//! User entity model.

use agenda_core::link::LinkState;
use agenda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table (the fields this engine reads).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub is_approved: bool,
    /// IANA zone name; unresolvable values are coerced to UTC at read time.
    pub timezone: String,
    pub notification_language: String,
    /// Present iff the user completed the Telegram link handshake.
    pub telegram_chat_id: Option<i64>,
    /// Live only while a link handshake is pending.
    #[serde(skip_serializing)]
    pub telegram_subscription_token: Option<String>,
    pub daily_notifications_enabled: bool,
    /// Idempotency marker: UTC start of the last digest period sent.
    pub daily_last_period_start: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// Reconcile the two nullable link columns into the explicit state.
    pub fn link_state(&self) -> LinkState {
        LinkState::from_columns(
            self.telegram_chat_id,
            self.telegram_subscription_token.as_deref(),
        )
    }
}
