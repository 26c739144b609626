//! Command table: which protocol commands the client understands.
//!
//! Lookup is by exact command text. Three-digit replies are keyed by their
//! numeric value so `001` and `1` would name the same entry, which is
//! how servers are observed to behave anyway.

use lobbylink_protocol::IrcMessage;

// ---------------------------------------------------------------------------
// CommandKind
// ---------------------------------------------------------------------------

/// What the dispatcher does with a recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `001`: registration accepted.
    Welcome,
    /// Informational or rejection reply shown as `prefix: params[1]`.
    ServerMessage,
    /// Statistics reply shown as `prefix: params[1] params[2]`.
    ServerMessagePair,
    /// `301`
    Away,
    /// `332`
    Topic,
    /// `352`
    WhoReply,
    /// `353`
    Names,
    /// `433`: shown, then the connection is dropped.
    NicknameInUse,
    /// `451`: the server wants registration resent.
    NotRegistered,
    /// `471`
    ChannelFull,
    /// `475`
    BadChannelKey,
    Notice,
    Join,
    Part,
    Quit,
    Privmsg,
    Mode,
    Kick,
    Error,
    Ping,
}

/// Numeric replies the client reacts to.
pub const NUMERIC_COMMANDS: &[(u16, CommandKind)] = &[
    (1, CommandKind::Welcome),
    (2, CommandKind::ServerMessage),
    (3, CommandKind::ServerMessage),
    (251, CommandKind::ServerMessage),
    (252, CommandKind::ServerMessagePair),
    (254, CommandKind::ServerMessagePair),
    (255, CommandKind::ServerMessage),
    (265, CommandKind::ServerMessage),
    (266, CommandKind::ServerMessage),
    (301, CommandKind::Away),
    (332, CommandKind::Topic),
    (352, CommandKind::WhoReply),
    (353, CommandKind::Names),
    (401, CommandKind::ServerMessage),
    (403, CommandKind::ServerMessage),
    (404, CommandKind::ServerMessage),
    (432, CommandKind::ServerMessage),
    (433, CommandKind::NicknameInUse),
    (451, CommandKind::NotRegistered),
    (461, CommandKind::ServerMessage),
    (465, CommandKind::ServerMessage),
    (471, CommandKind::ChannelFull),
    (474, CommandKind::ServerMessage),
    (475, CommandKind::BadChannelKey),
];

/// Textual commands the client reacts to.
pub const TEXT_COMMANDS: &[(&str, CommandKind)] = &[
    ("NOTICE", CommandKind::Notice),
    ("JOIN", CommandKind::Join),
    ("PART", CommandKind::Part),
    ("QUIT", CommandKind::Quit),
    ("PRIVMSG", CommandKind::Privmsg),
    ("MODE", CommandKind::Mode),
    ("KICK", CommandKind::Kick),
    ("ERROR", CommandKind::Error),
    ("PING", CommandKind::Ping),
];

impl CommandKind {
    /// Finds the handler for `msg`, or `None` if the command is ignored.
    pub fn lookup(msg: &IrcMessage) -> Option<Self> {
        match msg.numeric() {
            Some(code) => NUMERIC_COMMANDS
                .iter()
                .find(|(n, _)| *n == code)
                .map(|(_, kind)| *kind),
            None => TEXT_COMMANDS
                .iter()
                .find(|(name, _)| *name == msg.command)
                .map(|(_, kind)| *kind),
        }
    }

    /// Whether the command is only meaningful with a `nick!user@host` prefix.
    pub fn requires_sender(self) -> bool {
        matches!(
            self,
            Self::Join | Self::Part | Self::Quit | Self::Privmsg | Self::Mode
        )
    }
}
