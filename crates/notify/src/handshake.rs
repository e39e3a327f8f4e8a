//! Telegram link handshake resolver.
//!
//! Turns a one-time subscription token plus the inbound update stream
//! into a bound chat identity. The remote API only exposes a cursor-based
//! poll, so `verify` tolerates being called repeatedly with no match and
//! always advances the cursor past scanned traffic: a rewinding cursor
//! would let old `/start` messages replay and mis-link a later user.

use std::sync::Arc;

use agenda_core::error::CoreError;
use agenda_core::link::{generate_token, LinkState};
use agenda_core::message::{link_confirmation, start_payload_matches, Locale};
use agenda_core::types::DbId;
use agenda_db::repositories::{BotSettingsRepo, UserRepo};
use agenda_db::DbPool;
use agenda_telegram::Update;

use crate::transport::ChatTransport;
use crate::NotifyError;

/// Outcome of a [`LinkHandshake::verify`] call.
///
/// All of these are ordinary results, not errors: "no pending token" and
/// "bot not configured" short-circuit cleanly so the frontend can poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    /// The `/start` message arrived and the chat is now bound.
    Linked,
    /// No matching message yet; ask again later.
    Waiting,
    /// The user has no live subscription token.
    NoPendingToken,
    /// No bot token is configured in `bot_settings`.
    NotConfigured,
}

impl VerifyStatus {
    /// True once a chat is bound.
    pub fn is_linked(self) -> bool {
        matches!(self, VerifyStatus::Linked)
    }

    /// Short status text for API responses.
    pub fn describe(self) -> &'static str {
        match self {
            VerifyStatus::Linked => "linked",
            VerifyStatus::Waiting => "waiting for /start message",
            VerifyStatus::NoPendingToken => "no pending token",
            VerifyStatus::NotConfigured => "bot token not configured",
        }
    }
}

/// Result of scanning one batch of updates for a `/start` token match.
#[derive(Debug, Default, PartialEq, Eq)]
struct UpdateScan {
    /// Chat id of the first message carrying the expected payload.
    matched_chat: Option<i64>,
    /// Highest update id seen, match or not.
    max_update_id: Option<i64>,
}

/// Scan updates for `"/start <token>"`, tracking the highest update id
/// regardless of match so unrelated traffic is never re-scanned.
fn scan_updates(updates: &[Update], token: &str) -> UpdateScan {
    let mut scan = UpdateScan::default();

    for update in updates {
        scan.max_update_id = Some(scan.max_update_id.map_or(update.update_id, |max: i64| {
            max.max(update.update_id)
        }));

        if scan.matched_chat.is_none() {
            if let Some(message) = &update.message {
                if let Some(text) = &message.text {
                    if start_payload_matches(text, token) {
                        scan.matched_chat = Some(message.chat.id);
                    }
                }
            }
        }
    }

    scan
}

/// Resolves link handshakes for individual users.
pub struct LinkHandshake<T> {
    pool: DbPool,
    transport: Arc<T>,
}

impl<T: ChatTransport> LinkHandshake<T> {
    pub fn new(pool: DbPool, transport: Arc<T>) -> Self {
        Self { pool, transport }
    }

    /// Issue a fresh subscription token for a user.
    ///
    /// Re-issuing invalidates any prior link attempt: the previous token
    /// is replaced and an existing chat binding is cleared.
    pub async fn issue_token(&self, user_id: DbId) -> Result<String, NotifyError> {
        let token = generate_token();

        let mut tx = self.pool.begin().await?;
        let found = UserRepo::issue_subscription_token(&mut tx, user_id, &token).await?;
        if !found {
            return Err(CoreError::NotFound {
                entity: "user",
                id: user_id,
            }
            .into());
        }
        tx.commit().await?;

        tracing::info!(user_id, "Issued telegram subscription token");
        Ok(token)
    }

    /// Poll the update stream for this user's `/start` message.
    ///
    /// On a match the chat is bound, the token consumed, and a localized
    /// confirmation sent best-effort after commit (a failed confirmation
    /// never reverts the link). On no match the cursor still advances
    /// past everything scanned.
    pub async fn verify(&self, user_id: DbId) -> Result<VerifyStatus, NotifyError> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepo::get(&mut tx, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let token = match user.link_state() {
            LinkState::Linked(_) => return Ok(VerifyStatus::Linked),
            LinkState::Unlinked => return Ok(VerifyStatus::NoPendingToken),
            LinkState::TokenIssued(token) => token,
        };

        let settings = BotSettingsRepo::get(&mut tx).await?;
        let Some(bot_token) = settings.bot_token else {
            return Ok(VerifyStatus::NotConfigured);
        };

        let updates = match self
            .transport
            .fetch_updates(&bot_token, settings.last_update_id + 1)
            .await
        {
            Ok(updates) => updates,
            Err(e) => {
                // Cursor must not advance past traffic we failed to read.
                tracing::warn!(user_id, error = %e, "fetch_updates failed during link verify");
                return Ok(VerifyStatus::Waiting);
            }
        };

        let scan = scan_updates(&updates, &token);
        if let Some(max) = scan.max_update_id {
            BotSettingsRepo::advance_cursor(&mut tx, max).await?;
        }

        let Some(chat_id) = scan.matched_chat else {
            tx.commit().await?;
            return Ok(VerifyStatus::Waiting);
        };

        UserRepo::bind_telegram_chat(&mut tx, user_id, chat_id).await?;
        tx.commit().await?;
        tracing::info!(user_id, chat_id, "Telegram chat linked");

        let locale = Locale::from_code(&user.notification_language);
        if let Err(e) = self
            .transport
            .send_message(&bot_token, chat_id, link_confirmation(locale))
            .await
        {
            tracing::warn!(user_id, chat_id, error = %e, "Failed to send link confirmation");
        }

        Ok(VerifyStatus::Linked)
    }
}
