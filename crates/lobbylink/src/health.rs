//! Read-failure bookkeeping for the receive loop.

use lobbylink_transport::TransportError;

/// Reason reported when the server keeps returning end-of-stream.
pub(crate) const SERVER_DISCONNECTED: &str = "Server disconnected.";

/// What the receive loop should do after a bad read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadVerdict {
    /// Keep reading.
    Tolerated,
    /// The threshold was reached; the connection is lost for this reason.
    Fatal(String),
}

/// Counts consecutive failed reads and empty reads separately.
///
/// Reaching `threshold` on either counter is fatal. A successful
/// non-empty read resets both. A read that hits its deadline counts as
/// a failed read.
#[derive(Debug)]
pub(crate) struct ReadHealth {
    threshold: u32,
    failed: u32,
    empty: u32,
}

impl ReadHealth {
    pub(crate) fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            failed: 0,
            empty: 0,
        }
    }

    pub(crate) fn record_failure(&mut self, err: &TransportError) -> ReadVerdict {
        self.failed += 1;
        if self.failed >= self.threshold {
            ReadVerdict::Fatal(err.to_string())
        } else {
            ReadVerdict::Tolerated
        }
    }

    pub(crate) fn record_empty(&mut self) -> ReadVerdict {
        self.empty += 1;
        if self.empty >= self.threshold {
            ReadVerdict::Fatal(SERVER_DISCONNECTED.to_owned())
        } else {
            ReadVerdict::Tolerated
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.failed = 0;
        self.empty = 0;
    }

    pub(crate) fn failed(&self) -> u32 {
        self.failed
    }

    pub(crate) fn empty(&self) -> u32 {
        self.empty
    }
}
