//! Daily digest dispatcher.
//!
//! Once per local day, at the digest hour, each opted-in user gets an
//! agenda of the next 24 hours. The `daily_last_period_start` marker is
//! written before the send attempt so two overlapping trigger-minute
//! ticks cannot double-send; a send that then fails is logged and not
//! retried, matching the reminder sweep's attempt-once contract.

use std::sync::Arc;

use agenda_core::message::{digest_text, DigestEntry, Locale};
use agenda_core::period::{is_digest_trigger_minute, period_end, period_start, resolve_timezone};
use agenda_core::types::Timestamp;
use agenda_db::models::User;
use agenda_db::repositories::{BotSettingsRepo, EventRepo, UserRepo};
use agenda_db::DbPool;
use chrono::Utc;

use crate::transport::ChatTransport;

/// Sweeps for users whose local wall clock is at the digest trigger minute.
pub struct DigestDispatcher<T> {
    pool: DbPool,
    transport: Arc<T>,
}

impl<T: ChatTransport> DigestDispatcher<T> {
    pub fn new(pool: DbPool, transport: Arc<T>) -> Self {
        Self { pool, transport }
    }

    /// Run one digest sweep.
    ///
    /// Database errors roll the whole tick back; a user skipped because
    /// the process was down during their entire trigger minute is a
    /// documented limitation, not retried.
    pub async fn sweep(&self) -> Result<(), sqlx::Error> {
        self.sweep_at(Utc::now()).await
    }

    /// Run one digest sweep evaluated at `now`.
    ///
    /// Split out from [`sweep`](Self::sweep) so the trigger-minute and
    /// once-per-period behaviour can be exercised at a fixed instant.
    pub async fn sweep_at(&self, now: Timestamp) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let settings = BotSettingsRepo::get(&mut tx).await?;
        let Some(bot_token) = settings.bot_token else {
            tracing::debug!("No bot token, skipping digest sweep");
            tx.commit().await?;
            return Ok(());
        };

        let candidates = UserRepo::list_digest_candidates(&mut tx).await?;

        for user in &candidates {
            let tz = resolve_timezone(&user.timezone);
            if !is_digest_trigger_minute(now, tz) {
                continue;
            }

            let start = period_start(now, tz);
            if user.daily_last_period_start == Some(start) {
                // Already attempted for this period.
                continue;
            }

            // Advance the marker before sending; the monotonic guard also
            // rejects stale periods.
            if !UserRepo::advance_daily_marker(&mut tx, user.id, start).await? {
                continue;
            }

            let events = EventRepo::list_in_window(&mut tx, start, period_end(start)).await?;
            let entries: Vec<DigestEntry> = events
                .iter()
                .map(|e| (e.start_time, e.title.clone()))
                .collect();

            self.send_digest(&bot_token, user, &entries).await;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Compose and send one user's agenda. An empty agenda is suppressed
    /// (the marker has already advanced); transport failures are logged
    /// and do not block other users.
    pub(crate) async fn send_digest(&self, bot_token: &str, user: &User, entries: &[DigestEntry]) {
        let Some(chat_id) = user.telegram_chat_id else {
            return;
        };

        let tz = resolve_timezone(&user.timezone);
        let locale = Locale::from_code(&user.notification_language);
        let Some(text) = digest_text(locale, entries, tz) else {
            tracing::debug!(user_id = user.id, "Empty digest suppressed");
            return;
        };

        match self.transport.send_message(bot_token, chat_id, &text).await {
            Ok(()) => {
                tracing::info!(user_id = user.id, events = entries.len(), "Daily digest sent");
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Failed to send daily digest");
            }
        }
    }
}
