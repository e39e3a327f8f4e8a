//! Row models for the notification engine's tables.

pub mod bot_settings;
pub mod event;
pub mod user;

pub use bot_settings::BotSettings;
pub use event::{Event, NotifyMode};
pub use user::User;
