//! Wire protocol for lobbylink.
//!
//! This crate defines how the text protocol looks on the wire:
//!
//! - **Codec** ([`LineDecoder`], [`LineFramer`], [`encode_line`]): bytes
//!   in, complete lines out; lines in, `\r\n`-terminated bytes out.
//! - **Messages** ([`IrcMessage`]): one line split into prefix, command
//!   and parameters.
//! - **Outbound** ([`outbound`]): the handful of commands the client
//!   sends on its own behalf (registration, keepalive, quit).
//! - **Errors** ([`ProtocolError`]): what can go wrong with one line.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and dispatch
//! (events). It doesn't know about sockets or sinks.
//!
//! ```text
//! Transport (bytes) → Protocol (IrcMessage) → Dispatch (events)
//! ```

mod codec;
mod error;
mod message;
pub mod outbound;

pub use codec::{encode_line, LineDecoder, LineFramer, LINE_TERMINATOR};
pub use error::ProtocolError;
pub use message::{ctcp_payload, IrcMessage, CTCP_DELIMITER};
