//! Route definitions for the bot credential.
//!
//! The engine owns the `bot_settings` row, so the credential is managed
//! here rather than in the CRUD service. Clearing the token (body with
//! `"bot_token": null`) disables all outbound delivery; sweeps keep
//! running and no-op until a token is set again.

use axum::extract::State;
use axum::routing::put;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use agenda_db::repositories::BotSettingsRepo;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpdateBotTokenRequest {
    /// New Telegram bot credential, or `null` to clear it.
    pub bot_token: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateBotTokenResponse {
    /// Whether a credential is configured after the update.
    pub configured: bool,
}

/// PUT /admin/bot/token -- set or clear the Telegram bot credential.
async fn update_bot_token(
    State(state): State<AppState>,
    Json(req): Json<UpdateBotTokenRequest>,
) -> AppResult<Json<UpdateBotTokenResponse>> {
    let configured = req.bot_token.is_some();

    let mut conn = state.pool.acquire().await?;
    BotSettingsRepo::set_bot_token(&mut conn, req.bot_token.as_deref()).await?;

    tracing::info!(configured, "Bot credential updated");
    Ok(Json(UpdateBotTokenResponse { configured }))
}

/// Routes mounted at `/admin/bot`.
///
/// ```text
/// PUT /token  -> update_bot_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/token", put(update_bot_token))
}
