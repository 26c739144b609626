//! Queued message types: what sits in the outbound queue.
//!
//! A queued message is one complete protocol line waiting to be written,
//! tagged with:
//! - WHAT kind of message it is ([`MessageType`]), which decides whether
//!   a newer message of the same kind replaces it
//! - HOW urgent it is (`priority`), which decides where it is inserted

use std::fmt;

/// Priority used for protocol housekeeping (PONG replies, keepalive PINGs).
///
/// High enough to jump ahead of any chat or game traffic.
pub const SYSTEM_PRIORITY: i32 = 5000;

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// The category of a queued message.
///
/// Most categories are ordinary: every message is kept and sent. The
/// *exclusive* categories describe state that only matters in its latest
/// form (the current player list, the current game settings, ...). The
/// queue holds at most one pending message per exclusive category; a new
/// one overwrites the old one in place.
///
/// ```text
///   ordinary:   [chat A] [chat B] + chat C  → [chat A] [chat B] [chat C]
///   exclusive:  [players v1] [chat] + players v2 → [players v2] [chat]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    /// Anything without special handling.
    #[default]
    Standard,
    /// Protocol housekeeping generated by the client itself.
    System,
    /// Channel and private chat lines.
    Chat,

    // -- Exclusive categories --
    /// Periodic game-room advertisement.
    GameBroadcasting,
    /// Player-list update of a hosted game.
    GamePlayers,
    /// Game settings update.
    GameSettings,
    /// Players' ready flags.
    GamePlayersReadyStatus,
    /// Game room locked/unlocked.
    GameLocked,
    /// "Get ready" request from the host.
    GameGetReady,
    /// In-game notification.
    GameNotification,
    /// Hosting notice.
    GameHosting,
    /// WHOIS lookup.
    Whois,
}

impl MessageType {
    /// Returns `true` for categories that keep at most one pending message.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::Standard | Self::System | Self::Chat)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// QueuedMessage
// ---------------------------------------------------------------------------

/// One outbound line waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    /// The complete line, without terminator.
    pub payload: String,
    /// Category; see [`MessageType`].
    pub message_type: MessageType,
    /// Higher values are sent first. Equal priorities keep arrival order.
    pub priority: i32,
}

impl QueuedMessage {
    /// Creates a queued message.
    pub fn new(
        payload: impl Into<String>,
        message_type: MessageType,
        priority: i32,
    ) -> Self {
        Self {
            payload: payload.into(),
            message_type,
            priority,
        }
    }

    /// A [`MessageType::System`] message at [`SYSTEM_PRIORITY`].
    pub fn system(payload: impl Into<String>) -> Self {
        Self::new(payload, MessageType::System, SYSTEM_PRIORITY)
    }
}
