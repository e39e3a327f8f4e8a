//! Process-wide sweep timer.
//!
//! A single recurring timer drives both dispatchers: once at startup,
//! then every 60 seconds. There is no worker pool and no cross-process
//! coordination; exactly one engine instance is assumed live. Each sweep
//! is guarded by its own async mutex so the admin endpoints can trigger
//! it manually without ever overlapping a timer-driven run of the same
//! sweep (the two different sweeps may run concurrently).

use std::sync::Arc;

use std::time::Duration;

use agenda_db::DbPool;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::digest::DigestDispatcher;
use crate::reminder::ReminderDispatcher;
use crate::transport::ChatTransport;

/// How often both sweeps run.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Owns the two dispatchers and their non-overlap guards.
pub struct NotificationEngine<T> {
    reminders: ReminderDispatcher<T>,
    digests: DigestDispatcher<T>,
    reminder_guard: Mutex<()>,
    digest_guard: Mutex<()>,
}

impl<T: ChatTransport> NotificationEngine<T> {
    pub fn new(pool: DbPool, transport: Arc<T>) -> Self {
        Self {
            reminders: ReminderDispatcher::new(pool.clone(), Arc::clone(&transport)),
            digests: DigestDispatcher::new(pool, transport),
            reminder_guard: Mutex::new(()),
            digest_guard: Mutex::new(()),
        }
    }

    /// Run one reminder sweep; serialized against itself.
    pub async fn run_reminder_sweep(&self) -> Result<(), sqlx::Error> {
        let _guard = self.reminder_guard.lock().await;
        self.reminders.sweep().await
    }

    /// Run one digest sweep; serialized against itself.
    pub async fn run_digest_sweep(&self) -> Result<(), sqlx::Error> {
        let _guard = self.digest_guard.lock().await;
        self.digests.sweep().await
    }

    /// Run the sweep loop until `cancel` is triggered.
    ///
    /// The first interval tick fires immediately, covering the
    /// "once at startup" requirement. A failed sweep is logged and the
    /// loop continues; the failed tick's transaction has already rolled
    /// back, so the next tick retries from committed state.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        tracing::info!(
            interval_secs = SWEEP_INTERVAL.as_secs(),
            "Notification engine started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification engine shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_reminder_sweep().await {
                        tracing::error!(error = %e, "Reminder sweep failed, retrying next tick");
                    }
                    if let Err(e) = self.run_digest_sweep().await {
                        tracing::error!(error = %e, "Digest sweep failed, retrying next tick");
                    }
                }
            }
        }
    }
}
