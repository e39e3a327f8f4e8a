//! Telegram Bot API client using raw reqwest (no bot framework).
//!
//! The engine needs exactly three remote operations: long-poll
//! `getUpdates` with a cursor, `sendMessage`, and `sendPhoto`.

mod client;
mod types;

pub use client::{TelegramClient, TransportError};
pub use types::{Chat, Message, Update};
