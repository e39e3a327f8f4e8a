//! Repository for the singleton `bot_settings` row.

use sqlx::PgConnection;

use crate::models::BotSettings;

/// Access to the Telegram bot credential and update-stream cursor.
pub struct BotSettingsRepo;

impl BotSettingsRepo {
    /// Load the singleton row (seeded by migration, always present).
    pub async fn get(conn: &mut PgConnection) -> Result<BotSettings, sqlx::Error> {
        sqlx::query_as::<_, BotSettings>(
            "SELECT id, bot_token, last_update_id FROM bot_settings WHERE id = 1",
        )
        .fetch_one(conn)
        .await
    }

    /// Advance the update-stream cursor.
    ///
    /// `GREATEST` makes the write idempotent and monotone: the cursor
    /// never regresses, so old `/start` messages cannot be replayed.
    pub async fn advance_cursor(
        conn: &mut PgConnection,
        update_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bot_settings \
             SET last_update_id = GREATEST(last_update_id, $1) \
             WHERE id = 1",
        )
        .bind(update_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Set or clear the bot credential (operator surface).
    pub async fn set_bot_token(
        conn: &mut PgConnection,
        bot_token: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bot_settings SET bot_token = $1 WHERE id = 1")
            .bind(bot_token)
            .execute(conn)
            .await?;
        Ok(())
    }
}
