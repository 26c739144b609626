//! Connection lifecycle state.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where the client is in its connection lifecycle.
///
/// ```text
/// Idle → Connecting → Connected → Disconnecting → Disconnected
///            │            │
///            ▼            ▼
///          Idle      Reconnecting → Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Idle = 0,
    Connecting = 1,
    Connected = 2,
    Disconnecting = 3,
    Disconnected = 4,
    Reconnecting = 5,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Disconnecting,
            4 => Self::Disconnected,
            5 => Self::Reconnecting,
            _ => Self::Idle,
        }
    }

    /// Whether a new connection may be started from this state.
    pub fn can_connect(self) -> bool {
        matches!(self, Self::Idle | Self::Disconnected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(name)
    }
}

/// A [`ConnectionState`] readable from any task without locking.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves to `Connecting` only if no connection is in progress or up.
    ///
    /// Returns the state that blocked the transition on failure.
    pub(crate) fn try_begin_connect(&self) -> Result<(), ConnectionState> {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let state = ConnectionState::from_u8(current);
            if !state.can_connect() {
                return Err(state);
            }
            match self.0.compare_exchange(
                current,
                ConnectionState::Connecting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}
