//! Notification scheduling and delivery engine.
//!
//! Two idempotent sweeps (pre-event reminders, daily digests) driven by a
//! 60-second timer, plus the Telegram link handshake. Idempotency comes
//! from persisted markers (`notified_at`, `daily_last_period_start`),
//! not from a job queue; see the repository docs in `agenda-db`.

pub mod digest;
pub mod handshake;
pub mod reminder;
pub mod scheduler;
pub mod transport;

pub use digest::DigestDispatcher;
pub use handshake::{LinkHandshake, VerifyStatus};
pub use reminder::ReminderDispatcher;
pub use scheduler::NotificationEngine;
pub use transport::ChatTransport;

use agenda_core::error::CoreError;

/// Error type for the engine's caller-facing operations.
///
/// Sweep-internal transport failures never surface here; they are logged
/// at the per-recipient call site and the sweep continues.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A domain rule was violated (unknown user, etc.).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error; the enclosing transaction rolls back and the
    /// operation is retried on a later tick or request.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording chat transport for dispatcher tests.

    use std::collections::HashSet;
    use std::sync::Mutex;

    use agenda_telegram::{TransportError, Update};
    use async_trait::async_trait;

    use crate::transport::ChatTransport;

    /// One outbound call captured by [`RecordingTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Message { chat_id: i64, text: String },
        Photo { chat_id: i64, url: String },
    }

    /// In-memory transport that records sends and can fail per chat.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<Sent>>,
        pub failing_chats: HashSet<i64>,
        pub updates: Mutex<Vec<Update>>,
        pub fail_fetch: bool,
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
            _offset: i64,
        ) -> Result<Vec<Update>, TransportError> {
            if self.fail_fetch {
                return Err(TransportError::Api("unreachable".into()));
            }
            Ok(self.updates.lock().unwrap().clone())
        }

        async fn send_message(
            &self,
            _bot_token: &str,
            chat_id: i64,
            text: &str,
        ) -> Result<(), TransportError> {
            if self.failing_chats.contains(&chat_id) {
                return Err(TransportError::Api("blocked by user".into()));
            }
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
            if self.failing_chats.contains(&chat_id) {
                return Err(TransportError::Api("blocked by user".into()));
            }
            self.sent.lock().unwrap().push(Sent::Photo {
                chat_id,
                url: photo_url.to_string(),
            });
            Ok(())
        }
    }
}
