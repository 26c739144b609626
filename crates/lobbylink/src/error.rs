//! Unified error type for the lobbylink client.

use std::path::PathBuf;

use lobbylink_dispatch::DispatchError;
use lobbylink_protocol::ProtocolError;
use lobbylink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant generates the `From`
/// impl, so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// A transport-level error (connect, read, write).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A single line could not be parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A parsed line could not be interpreted.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The client configuration is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `connect_async` was called while a connection is up.
    #[error("already connected")]
    AlreadyConnected,

    /// `connect_async` was called while a connection attempt is running.
    #[error("a connection attempt is already in progress")]
    AlreadyConnecting,

    /// The global tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Errors from loading or validating a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a client config.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// The local player name is empty.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    /// The endpoint directory has no entries.
    #[error("endpoint directory is empty")]
    NoEndpoints,

    /// An endpoint lists no ports to try.
    #[error("endpoint {host} has no ports")]
    NoPorts { host: String },
}
