//! Bot settings singleton model.

use sqlx::FromRow;

/// The singleton `bot_settings` row (`id = 1`).
#[derive(Debug, Clone, FromRow)]
pub struct BotSettings {
    pub id: i16,
    /// Telegram bot credential; `None` means the transport is not
    /// configured and sweeps no-op.
    pub bot_token: Option<String>,
    /// Monotonic cursor into the Telegram update stream.
    pub last_update_id: i64,
}
