//! Route definitions for the Telegram link handshake.
//!
//! Both endpoints are driven by the user's settings page: issuing a
//! token shows the `/start` deep link, and the page polls `verify`
//! until the bot sees the matching message.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use agenda_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

/// Response for a freshly issued subscription token.
#[derive(Serialize)]
pub struct TokenResponse {
    /// One-time token the user sends the bot via `/start <token>`.
    pub token: String,
}

/// Response for a verify poll.
#[derive(Serialize)]
pub struct VerifyResponse {
    /// True once the chat is bound.
    pub linked: bool,
    /// Human-readable progress status.
    pub status: &'static str,
}

/// POST /users/{id}/telegram/token -- issue a fresh subscription token.
///
/// Re-issuing replaces any earlier token and unbinds an existing chat.
async fn issue_token(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.handshake.issue_token(user_id).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /users/{id}/telegram/verify -- poll the update stream for the
/// user's `/start` message and bind the chat on a match.
async fn verify(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<VerifyResponse>> {
    let status = state.handshake.verify(user_id).await?;
    Ok(Json(VerifyResponse {
        linked: status.is_linked(),
        status: status.describe(),
    }))
}

/// Routes mounted at `/users`.
///
/// ```text
/// POST /{id}/telegram/token   -> issue_token
/// POST /{id}/telegram/verify  -> verify
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/telegram/token", post(issue_token))
        .route("/{id}/telegram/verify", post(verify))
}
