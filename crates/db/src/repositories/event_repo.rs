//! Repository for the `events` table.

use agenda_core::types::{DbId, Timestamp};
use sqlx::PgConnection;

use crate::models::Event;

/// Column list for `events` queries.
const COLUMNS: &str = "id, title, start_time, end_time, notes, notify_mode, \
                       notify_minutes_before, notified_at, created_at";

/// Read/write access to event scheduling fields.
pub struct EventRepo;

impl EventRepo {
    /// Events whose reminder lead time has arrived and whose reminder has
    /// not been attempted yet.
    ///
    /// An event that already started is excluded: a reminder is
    /// meaningless after the fact and must not fire late.
    pub async fn list_due_reminders(
        conn: &mut PgConnection,
        now: Timestamp,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events \
             WHERE notified_at IS NULL \
               AND notify_mode <> 'none' \
               AND start_time - make_interval(mins => notify_minutes_before) <= $1 \
               AND $1 < start_time \
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(now)
            .fetch_all(conn)
            .await
    }

    /// Events starting in `[from, to)`, ordered by start time.
    pub async fn list_in_window(
        conn: &mut PgConnection,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events \
             WHERE start_time >= $1 AND start_time < $2 \
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(conn)
            .await
    }

    /// Set the reminder idempotency marker.
    ///
    /// Guarded on `notified_at IS NULL` so a marker, once written, is
    /// never overwritten with a later instant.
    pub async fn mark_notified(
        conn: &mut PgConnection,
        event_id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events SET notified_at = $2 \
             WHERE id = $1 AND notified_at IS NULL",
        )
        .bind(event_id)
        .bind(at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
