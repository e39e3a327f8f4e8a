//! Route definitions for manual sweep triggers.
//!
//! The 60-second timer is the normal driver; these endpoints exist for
//! operations work (run a sweep right now instead of waiting a tick).
//! Each sweep is serialized against its timer-driven counterpart inside
//! the engine, so a manual trigger can never overlap one.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Response for a manually triggered sweep.
#[derive(Serialize)]
pub struct SweepResponse {
    /// Which sweep ran.
    pub sweep: &'static str,
    /// Always "completed"; failures surface as error responses.
    pub status: &'static str,
}

/// POST /admin/sweeps/reminders -- run one reminder sweep now.
async fn trigger_reminders(State(state): State<AppState>) -> AppResult<Json<SweepResponse>> {
    state.engine.run_reminder_sweep().await?;
    Ok(Json(SweepResponse {
        sweep: "reminders",
        status: "completed",
    }))
}

/// POST /admin/sweeps/digests -- run one digest sweep now.
async fn trigger_digests(State(state): State<AppState>) -> AppResult<Json<SweepResponse>> {
    state.engine.run_digest_sweep().await?;
    Ok(Json(SweepResponse {
        sweep: "digests",
        status: "completed",
    }))
}

/// Routes mounted at `/admin/sweeps`.
///
/// ```text
/// POST /reminders  -> trigger_reminders
/// POST /digests    -> trigger_digests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reminders", post(trigger_reminders))
        .route("/digests", post(trigger_digests))
}
