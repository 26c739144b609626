//! Error types for the protocol layer.
//!
//! Each crate in lobbylink defines its own error enum. A `ProtocolError`
//! always concerns one received line: it never means the connection is
//! broken, only that a single line could not be understood.

/// Errors that can occur while parsing a protocol line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The line had no command token after the optional prefix.
    ///
    /// Blank lines and lines consisting of only a prefix end up here.
    #[error("line has no command: {line:?}")]
    EmptyCommand {
        /// The offending line, for diagnostics.
        line: String,
    },

    /// A command handler asked for a parameter the line does not carry.
    ///
    /// `index` is 0-based, matching [`IrcMessage::params`](crate::IrcMessage::params).
    #[error("{command} is missing parameter {index}")]
    MissingParameter {
        /// The command being interpreted.
        command: String,
        /// The 0-based position that was requested.
        index: usize,
    },
}
