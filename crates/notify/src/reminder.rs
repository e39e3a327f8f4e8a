//! Pre-event reminder dispatcher.
//!
//! One sweep = one database transaction. The `notified_at` marker is the
//! idempotency boundary: a sweep only sees events whose marker is unset,
//! and writes the marker after attempting delivery to every recipient.
//! This is an at-most-one-attempt-per-trigger contract, not at-least-once;
//! a fully failed send is logged, never retried.

use std::sync::Arc;

use agenda_core::message::{extract_image_urls, reminder_text, Locale};
use agenda_core::period::resolve_timezone;
use agenda_core::types::Timestamp;
use agenda_db::models::{Event, NotifyMode, User};
use agenda_db::repositories::{BotSettingsRepo, EventRepo, UserRepo};
use agenda_db::DbPool;
use chrono::Utc;

use crate::transport::ChatTransport;

/// Sweeps for events whose reminder lead time has arrived.
pub struct ReminderDispatcher<T> {
    pool: DbPool,
    transport: Arc<T>,
}

impl<T: ChatTransport> ReminderDispatcher<T> {
    pub fn new(pool: DbPool, transport: Arc<T>) -> Self {
        Self { pool, transport }
    }

    /// Run one reminder sweep.
    ///
    /// Any database error rolls the whole tick back, leaving every marker
    /// untouched so the next tick retries from scratch.
    pub async fn sweep(&self) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let due = EventRepo::list_due_reminders(&mut tx, now).await?;
        if due.is_empty() {
            tx.commit().await?;
            return Ok(());
        }

        let settings = BotSettingsRepo::get(&mut tx).await?;
        let Some(bot_token) = settings.bot_token else {
            // Leave the events pending; they are retried next tick once
            // a token is configured.
            tracing::debug!(pending = due.len(), "No bot token, skipping reminder sweep");
            tx.commit().await?;
            return Ok(());
        };

        for event in &due {
            let recipients = match event.notify_mode {
                // Excluded by the eligibility query.
                NotifyMode::None => Vec::new(),
                NotifyMode::All => UserRepo::list_linked_approved(&mut tx).await?,
                // An empty explicit list means "notify nobody", not
                // "retry forever": the event still gets marked below.
                NotifyMode::Specific => UserRepo::list_notify_targets(&mut tx, event.id).await?,
            };

            self.deliver(&bot_token, event, &recipients, now).await;

            EventRepo::mark_notified(&mut tx, event.id, now).await?;
            tracing::info!(
                event_id = event.id,
                recipients = recipients.len(),
                "Reminder dispatched"
            );
        }

        tx.commit().await?;
        Ok(())
    }

    /// Send one event's reminder to every recipient, sequentially.
    ///
    /// Transport failures are logged per recipient and never block the
    /// rest of the batch or the marking step.
    pub(crate) async fn deliver(
        &self,
        bot_token: &str,
        event: &Event,
        recipients: &[User],
        now: Timestamp,
    ) {
        let images = extract_image_urls(&event.notes);

        for user in recipients {
            let Some(chat_id) = user.telegram_chat_id else {
                continue;
            };

            for url in &images {
                if let Err(e) = self.transport.send_photo(bot_token, chat_id, url).await {
                    tracing::warn!(
                        event_id = event.id,
                        user_id = user.id,
                        error = %e,
                        "Failed to send reminder photo"
                    );
                }
            }

            let tz = resolve_timezone(&user.timezone);
            let locale = Locale::from_code(&user.notification_language);
            let text = reminder_text(locale, &event.title, &event.notes, event.start_time, now, tz);

            if let Err(e) = self.transport.send_message(bot_token, chat_id, &text).await {
                tracing::warn!(
                    event_id = event.id,
                    user_id = user.id,
                    error = %e,
                    "Failed to send reminder"
                );
            }
        }
    }
}
