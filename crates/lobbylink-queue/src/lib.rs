//! Outbound message queue for lobbylink.
//!
//! This crate decides in which order outbound lines leave the client:
//!
//! 1. **Priority**: urgent housekeeping (PONG) overtakes chat
//! 2. **Coalescing**: for game-state categories only the newest pending
//!    message survives ([`MessageType::is_exclusive`])
//! 3. **Gating**: nothing is accepted while there is no connection
//!
//! # How it fits in the stack
//!
//! ```text
//! callers / dispatcher / keepalive ──enqueue──→ OutboundQueue ──drain──→ send loop
//! ```

mod message;
mod queue;

pub use message::{MessageType, QueuedMessage, SYSTEM_PRIORITY};
pub use queue::OutboundQueue;
