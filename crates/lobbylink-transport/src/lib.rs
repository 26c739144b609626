//! Transport abstraction layer for lobbylink.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! how a byte stream to a chat server is opened, so the supervisor above
//! can be driven by a real socket or by a scripted stand-in.
//!
//! # Feature Flags
//!
//! - `tcp` (default): plain TCP transport via `tokio::net`

mod error;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
#[cfg(feature = "tcp")]
pub use tcp::{TcpConnection, TcpConnector};

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outbound connections to a `(host, port)` pair.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Attempts a connection, giving up once `timeout` has elapsed.
    ///
    /// Never blocks past `timeout` regardless of the operating system's
    /// own connect timeout. Every failure is returned as an error.
    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single live byte stream.
///
/// All methods take `&self` so the receive loop and the send loop can
/// share one connection behind an `Arc`.
pub trait Connection: Send + Sync + 'static {
    /// Reads the next chunk of bytes into `buf`.
    ///
    /// Returns `Ok(0)` when the peer has closed the stream. Callers bound
    /// the wait with their own deadline.
    fn read(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = Result<usize, TransportError>> + Send;

    /// Writes all of `data` and flushes it immediately.
    fn write(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the connection. Closing twice is a no-op.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
