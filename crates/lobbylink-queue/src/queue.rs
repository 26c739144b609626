//! The outbound queue: the single point of outbound flow control.
//!
//! Every line the client sends after registration goes through here.
//! Three parties touch it concurrently:
//! - callers enqueueing chat and game traffic
//! - the dispatcher and keepalive timer enqueueing PONG/PING
//! - the send loop draining one message at a time
//!
//! # Concurrency note
//!
//! All access goes through one `std::sync::Mutex`. Every critical section
//! is a short scan or pop over an in-memory deque; the lock is never held
//! while a message is written to the socket.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::QueuedMessage;

#[derive(Debug, Default)]
struct Inner {
    messages: VecDeque<QueuedMessage>,
    /// Only accepts messages while a connection is live.
    open: bool,
}

/// Ordered buffer of pending outbound messages.
///
/// ## Ordering rules
///
/// ```text
/// exclusive type, one pending  → replace it where it stands
/// exclusive type, none pending → append at the tail
/// ordinary type                → insert before the first message with a
///                                strictly lower priority (stable for ties)
/// ```
///
/// Invariant: at most one pending message per exclusive [`MessageType`](crate::MessageType).
#[derive(Debug, Default)]
pub struct OutboundQueue {
    inner: Mutex<Inner>,
}

impl OutboundQueue {
    /// Creates an empty, closed queue.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts accepting messages.
    pub fn open(&self) {
        self.lock().open = true;
    }

    /// Stops accepting messages and drops everything pending.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.open = false;
        let dropped = inner.messages.len();
        inner.messages.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "outbound queue closed with pending messages");
        }
    }

    /// Whether [`enqueue`](Self::enqueue) currently accepts messages.
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Adds a message according to the ordering rules.
    ///
    /// Returns `false` (and drops the message) when the queue is closed,
    /// i.e. when there is no live connection to send it on.
    pub fn enqueue(&self, message: QueuedMessage) -> bool {
        let mut inner = self.lock();
        if !inner.open {
            tracing::trace!(payload = %message.payload, "queue closed, message dropped");
            return false;
        }

        if message.message_type.is_exclusive() {
            if let Some(index) = inner
                .messages
                .iter()
                .position(|m| m.message_type == message.message_type)
            {
                tracing::trace!(
                    message_type = %message.message_type,
                    index,
                    "replacing pending exclusive message"
                );
                inner.messages[index] = message;
            } else {
                inner.messages.push_back(message);
            }
            return true;
        }

        match inner
            .messages
            .iter()
            .position(|m| m.priority < message.priority)
        {
            Some(index) => inner.messages.insert(index, message),
            None => inner.messages.push_back(message),
        }
        true
    }

    /// Removes and returns the head of the queue.
    pub fn drain(&self) -> Option<QueuedMessage> {
        self.lock().messages.pop_front()
    }

    /// Drops every pending message without changing open/closed state.
    pub fn clear(&self) {
        self.lock().messages.clear();
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().messages.is_empty()
    }

    /// Copy of the pending messages in send order.
    pub fn snapshot(&self) -> Vec<QueuedMessage> {
        self.lock().messages.iter().cloned().collect()
    }
}

// =========================================================================
// Tests
// =========================================================================
