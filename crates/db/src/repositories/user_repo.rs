//! Repository for the `users` table.

use agenda_core::types::{DbId, Timestamp};
use sqlx::PgConnection;

use crate::models::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, is_approved, timezone, notification_language, \
                       telegram_chat_id, telegram_subscription_token, \
                       daily_notifications_enabled, daily_last_period_start, created_at";

/// Read/write access to user notification fields.
pub struct UserRepo;

impl UserRepo {
    /// Fetch a single user.
    pub async fn get(conn: &mut PgConnection, user_id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Every approved, linked user (recipients for `notify_mode = 'all'`).
    pub async fn list_linked_approved(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE is_approved AND telegram_chat_id IS NOT NULL \
             ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(conn).await
    }

    /// Approved, linked users listed for a `specific`-mode event.
    pub async fn list_notify_targets(
        conn: &mut PgConnection,
        event_id: DbId,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u \
             JOIN event_notify_users enu ON enu.user_id = u.id \
             WHERE enu.event_id = $1 \
               AND u.is_approved AND u.telegram_chat_id IS NOT NULL \
             ORDER BY u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(event_id)
            .fetch_all(conn)
            .await
    }

    /// Approved, linked users who opted into the daily digest.
    pub async fn list_digest_candidates(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE is_approved \
               AND telegram_chat_id IS NOT NULL \
               AND daily_notifications_enabled \
             ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(conn).await
    }

    /// Store a fresh subscription token and clear any existing chat
    /// binding: re-issuing invalidates a prior link attempt.
    ///
    /// Returns `false` if the user does not exist.
    pub async fn issue_subscription_token(
        conn: &mut PgConnection,
        user_id: DbId,
        token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users \
             SET telegram_subscription_token = $2, telegram_chat_id = NULL \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(token)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bind the chat identity and consume the pending token.
    pub async fn bind_telegram_chat(
        conn: &mut PgConnection,
        user_id: DbId,
        chat_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users \
             SET telegram_chat_id = $2, telegram_subscription_token = NULL \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(chat_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Advance the digest idempotency marker.
    ///
    /// The `WHERE` guard keeps `daily_last_period_start` monotone: a
    /// stale tick can never move it backwards.
    pub async fn advance_daily_marker(
        conn: &mut PgConnection,
        user_id: DbId,
        period_start: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET daily_last_period_start = $2 \
             WHERE id = $1 \
               AND (daily_last_period_start IS NULL OR daily_last_period_start <= $2)",
        )
        .bind(user_id)
        .bind(period_start)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
