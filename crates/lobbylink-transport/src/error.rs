use std::time::Duration;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The TCP connection could not be established.
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        /// The `host:port` that was attempted.
        addr: String,
        /// The underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection was not established within the allowed time.
    #[error("connect to {addr} timed out after {timeout:?}")]
    ConnectTimedOut {
        /// The `host:port` that was attempted.
        addr: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// Writing data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Nothing arrived within the per-read bound.
    #[error("no data received within {timeout:?}")]
    ReceiveTimedOut {
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// The connection has already been closed locally.
    #[error("connection closed")]
    Closed,
}
