//! # lobbylink
//!
//! Client core for an IRC-style game lobby.
//!
//! The application implements a single [`EventSink`](lobbylink_dispatch::EventSink)
//! trait and the client handles endpoint failover, registration,
//! keepalives, outbound rate limiting and loss detection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lobbylink::prelude::*;
//!
//! struct Quiet;
//! impl EventSink for Quiet {}
//!
//! # async fn run() -> Result<(), LobbyError> {
//! lobbylink::logging::init_logging("info")?;
//! let client = LobbyClient::new(ClientConfig::default(), Quiet)?;
//! client.connect_async()?;
//! // ... later
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connection;
mod endpoint;
mod error;
mod health;
pub mod logging;
mod state;

pub use client::LobbyClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, EndpointDirectory};
pub use error::{ConfigError, LobbyError};
pub use state::ConnectionState;

pub use lobbylink_dispatch as dispatch;
pub use lobbylink_protocol as protocol;
pub use lobbylink_queue as queue;
pub use lobbylink_transport as transport;

pub mod prelude {
    pub use crate::{
        ClientConfig, ConnectionState, Endpoint, EndpointDirectory, LobbyClient, LobbyError,
    };
    pub use lobbylink_dispatch::EventSink;
    pub use lobbylink_queue::{MessageType, QueuedMessage};
}
