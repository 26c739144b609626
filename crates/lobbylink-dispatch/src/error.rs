//! Error types for the dispatch layer.

use lobbylink_protocol::ProtocolError;

/// Reasons a parsed line could not be turned into events.
///
/// These never reach the caller: the dispatcher logs them and drops the
/// line, so one malformed reply cannot take the connection down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A parameter the handler needs is missing.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The command requires a `nick!user@host` prefix and did not have one.
    #[error("{command} has no user prefix")]
    MissingSender { command: String },
}
