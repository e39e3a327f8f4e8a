pub mod bot;
pub mod health;
pub mod sweeps;
pub mod telegram_link;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/{id}/telegram/token        issue subscription token (POST)
/// /users/{id}/telegram/verify       poll for /start message (POST)
///
/// /admin/bot/token                  set or clear bot credential (PUT)
/// /admin/sweeps/reminders           trigger reminder sweep (POST)
/// /admin/sweeps/digests             trigger digest sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", telegram_link::router())
        .nest("/admin/bot", bot::router())
        .nest("/admin/sweeps", sweeps::router())
}
