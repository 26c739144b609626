//! `LobbyClient`: the public handle applications hold.
//!
//! This ties together all the layers: endpoint directory → transport →
//! framing → dispatch, plus the outbound queue fed by callers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use lobbylink_dispatch::EventSink;
use lobbylink_protocol::outbound;
use lobbylink_queue::{MessageType, OutboundQueue, QueuedMessage};
use lobbylink_transport::{Connection, Connector, TcpConnector};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::config::ClientConfig;
use crate::connection::{run_connection, send_line};
use crate::state::{ConnectionState, StateCell};
use crate::LobbyError;

/// State shared by the client handle and the connection tasks.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
pub(crate) struct Shared<S: EventSink, C: Connector> {
    pub(crate) config: ClientConfig,
    pub(crate) sink: S,
    pub(crate) connector: C,
    pub(crate) queue: OutboundQueue,
    pub(crate) state: StateCell,
    /// Set by `disconnect`; the receive loop checks it between reads.
    pub(crate) disconnect_requested: AtomicBool,
    /// Set once the server has sent its welcome.
    pub(crate) registered: AtomicBool,
    /// The live connection, so `disconnect` can reach it.
    pub(crate) active: Mutex<Option<Arc<C::Connection>>>,
}

impl<S: EventSink, C: Connector> Shared<S, C> {
    pub(crate) fn disconnect_requested(&self) -> bool {
        self.disconnect_requested.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, conn: Option<Arc<C::Connection>>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = conn;
    }

    fn active(&self) -> Option<Arc<C::Connection>> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Flags an intentional disconnect, says QUIT and closes the transport.
    ///
    /// The receive loop notices the flag on its next iteration and runs
    /// the intentional teardown.
    pub(crate) async fn request_disconnect(&self) {
        self.disconnect_requested.store(true, Ordering::Release);
        if self.state.get() == ConnectionState::Connected {
            self.state.set(ConnectionState::Disconnecting);
            self.queue.close();
        }

        let Some(conn) = self.active() else {
            debug!(state = %self.state.get(), "disconnect requested without a live connection");
            return;
        };
        // Write errors are expected here: the server may already be gone.
        if let Err(e) = send_line(&*conn, &outbound::quit()).await {
            debug!(error = %e, "could not send QUIT");
        }
        if let Err(e) = conn.close().await {
            debug!(error = %e, "close failed");
        }
    }
}

/// Handle to one lobby chat connection.
///
/// Cloning is cheap; every clone drives the same connection.
///
/// # Example
///
/// ```rust,no_run
/// use lobbylink::prelude::*;
///
/// struct Printer;
/// impl EventSink for Printer {
///     fn on_chat_message_received(&self, channel: &str, user: &str, text: &str) {
///         println!("[{channel}] <{user}> {text}");
///     }
/// }
///
/// # async fn demo() -> Result<(), LobbyError> {
/// let client = LobbyClient::new(ClientConfig::default(), Printer)?;
/// client.connect_async()?;
/// client.queue_message("JOIN #cncnet", MessageType::Standard, 0);
/// # Ok(())
/// # }
/// ```
pub struct LobbyClient<S: EventSink, C: Connector = TcpConnector> {
    shared: Arc<Shared<S, C>>,
}

impl<S: EventSink, C: Connector> Clone for LobbyClient<S, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: EventSink> LobbyClient<S, TcpConnector> {
    /// Creates a client that connects over plain TCP.
    ///
    /// # Errors
    /// Returns [`LobbyError::Config`] if the config does not validate.
    pub fn new(config: ClientConfig, sink: S) -> Result<Self, LobbyError> {
        Self::with_connector(config, sink, TcpConnector)
    }
}

impl<S: EventSink, C: Connector> LobbyClient<S, C> {
    /// Creates a client that opens connections through `connector`.
    pub fn with_connector(config: ClientConfig, sink: S, connector: C) -> Result<Self, LobbyError> {
        let config = config.validated()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                sink,
                connector,
                queue: OutboundQueue::new(),
                state: StateCell::new(ConnectionState::Idle),
                disconnect_requested: AtomicBool::new(false),
                registered: AtomicBool::new(false),
                active: Mutex::new(None),
            }),
        })
    }

    /// Starts connecting in the background and returns immediately.
    ///
    /// Progress is reported through the event sink. The returned handle
    /// completes when the connection has been torn down again.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// [`LobbyError::AlreadyConnected`] or [`LobbyError::AlreadyConnecting`]
    /// when a connection is up or being set up or torn down.
    pub fn connect_async(&self) -> Result<JoinHandle<()>, LobbyError> {
        if let Err(state) = self.shared.state.try_begin_connect() {
            return Err(match state {
                ConnectionState::Connected | ConnectionState::Disconnecting => {
                    LobbyError::AlreadyConnected
                }
                _ => LobbyError::AlreadyConnecting,
            });
        }

        self.shared.disconnect_requested.store(false, Ordering::Release);
        self.shared.registered.store(false, Ordering::Release);
        info!(player = %self.shared.config.player_name, "connecting");

        Ok(tokio::spawn(run_connection(Arc::clone(&self.shared))))
    }

    /// Intentionally leaves the server.
    ///
    /// Sends QUIT and closes the transport right away; the event sink
    /// receives `on_disconnected` once the background tasks have stopped.
    /// No reconnect is signalled for this path.
    pub async fn disconnect(&self) {
        info!("disconnect requested");
        self.shared.request_disconnect().await;
    }

    /// Queues a line for sending. Returns `false` if not connected.
    pub fn queue_message(
        &self,
        payload: impl Into<String>,
        message_type: MessageType,
        priority: i32,
    ) -> bool {
        self.queue(QueuedMessage::new(payload, message_type, priority))
    }

    /// Queues a prepared message. Returns `false` if not connected.
    pub fn queue(&self, message: QueuedMessage) -> bool {
        trace!(
            message_type = %message.message_type,
            priority = message.priority,
            "queueing message"
        );
        self.shared.queue.enqueue(message)
    }

    /// Whether a live connection is up and accepting queued lines.
    pub fn is_connected(&self) -> bool {
        self.shared.state.get() == ConnectionState::Connected
    }

    /// Whether endpoints are still being tried.
    pub fn is_connecting(&self) -> bool {
        self.shared.state.get() == ConnectionState::Connecting
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    /// The validated config this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// The event sink passed at construction.
    pub fn sink(&self) -> &S {
        &self.shared.sink
    }

    /// Number of lines waiting to be sent.
    pub fn queued_len(&self) -> usize {
        self.shared.queue.len()
    }
}
