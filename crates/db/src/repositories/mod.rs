//! Repositories for the notification engine.
//!
//! Methods take `&mut PgConnection` rather than a pool reference because
//! each dispatcher tick runs inside a single transaction; callers pass
//! `&mut *tx` (or an acquired pool connection for one-off reads).

pub mod bot_settings_repo;
pub mod event_repo;
pub mod user_repo;

pub use bot_settings_repo::BotSettingsRepo;
pub use event_repo::EventRepo;
pub use user_repo::UserRepo;
