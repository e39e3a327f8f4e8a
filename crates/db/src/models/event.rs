//! Event entity model.

use agenda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Who gets the pre-start reminder for an event.
///
/// Stored as TEXT (`none` / `all` / `specific`), constrained by a CHECK
/// in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    /// No reminder for this event.
    None,
    /// Every approved, linked user.
    All,
    /// Only the users listed in `event_notify_users`.
    Specific,
}

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub notes: String,
    pub notify_mode: NotifyMode,
    /// Reminder lead time, 1..=10080 minutes.
    pub notify_minutes_before: i32,
    /// Idempotency marker: NULL until the reminder sweep has attempted
    /// delivery for the event's current schedule.
    pub notified_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
