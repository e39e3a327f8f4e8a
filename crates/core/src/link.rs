//! Telegram link handshake state.
//!
//! A user is either unlinked, waiting on a one-time subscription token,
//! or bound to a chat. The tagged representation keeps the illegal
//! "token and chat id both live" state unrepresentable; the nullable
//! columns it is loaded from are reconciled in [`LinkState::from_columns`].

use rand::Rng;

use crate::types::ChatId;

/// Length of the generated subscription token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// Per-user link handshake state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// No chat bound and no handshake pending.
    Unlinked,
    /// A one-time token has been issued; waiting for the `/start` message.
    TokenIssued(String),
    /// A chat is bound; notifications can be delivered.
    Linked(ChatId),
}

impl LinkState {
    /// Reconstruct the state from the two nullable user columns.
    ///
    /// A bound chat wins over a stale token: in steady state the two are
    /// mutually exclusive, and a row that somehow carries both is treated
    /// as linked (the token is dead weight to be cleared on next issue).
    pub fn from_columns(chat_id: Option<ChatId>, token: Option<&str>) -> Self {
        match (chat_id, token) {
            (Some(chat), _) => LinkState::Linked(chat),
            (None, Some(token)) => LinkState::TokenIssued(token.to_string()),
            (None, None) => LinkState::Unlinked,
        }
    }

    /// True if a chat is bound.
    pub fn is_linked(&self) -> bool {
        matches!(self, LinkState::Linked(_))
    }

    /// The pending token, if the handshake is in flight.
    pub fn pending_token(&self) -> Option<&str> {
        match self {
            LinkState::TokenIssued(token) => Some(token),
            _ => None,
        }
    }
}

/// Generate a fresh opaque subscription token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
