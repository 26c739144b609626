//! Per-connection supervisor: endpoint failover, the three connection
//! tasks and teardown.
//!
//! Each `connect_async` spawns one task running [`run_connection`]. The
//! flow is:
//!   1. Try every `(endpoint, port)` until one accepts
//!   2. Spawn the send-drain and keepalive tasks, send registration
//!   3. Loop: read → decode → frame → parse → dispatch
//!   4. Tear down, intentionally or after the link was lost

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use lobbylink_dispatch::{Action, Dispatcher, EventSink};
use lobbylink_keepalive::{ping_token, Watchdog};
use lobbylink_protocol::{encode_line, outbound, IrcMessage, LineDecoder, LineFramer};
use lobbylink_queue::QueuedMessage;
use lobbylink_transport::{Connection, Connector, TransportError};
use rand::Rng;
use tokio::sync::Notify;
use tokio::time;
use tracing::{debug, info, trace, warn};

use crate::client::Shared;
use crate::health::{ReadHealth, ReadVerdict};
use crate::state::ConnectionState;

/// Size of the receive buffer handed to each read.
const READ_BUFFER_SIZE: usize = 1024;

/// How long the send loop sleeps when the queue is empty.
const SEND_IDLE_POLL: Duration = Duration::from_millis(10);

/// How a live session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionEnd {
    Intentional,
    Lost(String),
}

/// Runs one connection from the first attempt to the final event.
pub(crate) async fn run_connection<S, C>(shared: Arc<Shared<S, C>>)
where
    S: EventSink,
    C: Connector,
{
    let Some(conn) = establish(&shared).await else {
        return;
    };
    let conn_id = conn.id();

    // A disconnect that arrived while the winning attempt was in flight.
    if shared.disconnect_requested() {
        info!(%conn_id, "disconnect requested while connecting, dropping new link");
        close_quietly(&conn).await;
        shared.state.set(ConnectionState::Disconnected);
        shared.sink.on_disconnected();
        return;
    }
    let conn = Arc::new(conn);

    shared.state.set(ConnectionState::Connected);
    shared.set_active(Some(Arc::clone(&conn)));
    shared.queue.open();
    shared.sink.on_connected();

    let activity = Arc::new(Notify::new());
    let send_task = tokio::spawn(send_loop(Arc::clone(&shared), Arc::clone(&conn)));
    let keepalive_task = tokio::spawn(keepalive_loop(Arc::clone(&shared), Arc::clone(&activity)));

    register(&shared, &*conn).await;
    let end = receive_loop(&shared, &*conn, &activity).await;

    keepalive_task.abort();
    shared.set_active(None);

    match end {
        SessionEnd::Intentional => {
            shared.state.set(ConnectionState::Disconnecting);
            shared.queue.close();
            close_quietly(&*conn).await;
            if let Err(e) = send_task.await {
                warn!(%conn_id, error = %e, "send task ended abnormally");
            }
            shared.state.set(ConnectionState::Disconnected);
            info!(%conn_id, "disconnected");
            shared.sink.on_disconnected();
        }
        SessionEnd::Lost(reason) => {
            shared.state.set(ConnectionState::Reconnecting);
            shared.queue.close();
            warn!(%conn_id, %reason, "connection lost");
            shared.sink.on_connection_lost(&reason);
            // The send task must be gone before the caller may reconnect,
            // or it could write a stale line to the old transport.
            if let Err(e) = send_task.await {
                warn!(%conn_id, error = %e, "send task ended abnormally");
            }
            close_quietly(&*conn).await;
            shared.state.set(ConnectionState::Idle);
            info!(%conn_id, "ready to reconnect");
            shared.sink.on_reconnect_attempt();
        }
    }
}

/// Tries every candidate in order. On exhaustion reports the failure and
/// returns `None`.
async fn establish<S, C>(shared: &Shared<S, C>) -> Option<C::Connection>
where
    S: EventSink,
    C: Connector,
{
    let timeout = shared.config.connect_timeout();

    for (endpoint, port) in shared.config.endpoints.candidates() {
        if shared.disconnect_requested() {
            info!("connection attempt cancelled");
            shared.state.set(ConnectionState::Disconnected);
            shared.sink.on_disconnected();
            return None;
        }

        shared.sink.on_attempted_server_changed(&endpoint.name);
        debug!(host = %endpoint.host, port, "attempting connection");

        match shared.connector.connect(&endpoint.host, port, timeout).await {
            Ok(conn) => {
                info!(host = %endpoint.host, port, conn_id = %conn.id(), "connected");
                return Some(conn);
            }
            Err(e) => {
                warn!(host = %endpoint.host, port, error = %e, "connection attempt failed");
            }
        }
    }

    warn!("every endpoint failed, giving up");
    shared.state.set(ConnectionState::Idle);
    shared.sink.on_connect_attempt_failed();
    None
}

/// Reads until the session ends. The only task that decides how.
async fn receive_loop<S, C>(shared: &Shared<S, C>, conn: &C::Connection, activity: &Notify) -> SessionEnd
where
    S: EventSink,
    C: Connector,
{
    let config = &shared.config;
    let read_timeout = config.read_timeout();
    let dispatcher = Dispatcher::new(config.player_name.clone());

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut decoder = LineDecoder::new();
    let mut framer = LineFramer::new();
    let mut health = ReadHealth::new(config.error_threshold);

    loop {
        if shared.disconnect_requested() {
            debug!(conn_id = %conn.id(), "disconnect flag observed");
            return SessionEnd::Intentional;
        }

        let verdict = match time::timeout(read_timeout, conn.read(&mut buf)).await {
            Err(_elapsed) => {
                let e = TransportError::ReceiveTimedOut {
                    timeout: read_timeout,
                };
                let verdict = health.record_failure(&e);
                trace!(failed = health.failed(), "read timed out");
                verdict
            }
            Ok(Ok(0)) => health.record_empty(),
            Ok(Err(e)) => {
                let verdict = health.record_failure(&e);
                trace!(error = %e, failed = health.failed(), "read failed");
                verdict
            }
            Ok(Ok(n)) => {
                health.record_success();
                activity.notify_one();

                let text = decoder.decode(&buf[..n]);
                for line in framer.push(&text) {
                    handle_line(shared, conn, &dispatcher, &line).await;
                }
                continue;
            }
        };

        if let ReadVerdict::Fatal(reason) = verdict {
            if shared.disconnect_requested() {
                return SessionEnd::Intentional;
            }
            debug!(failed = health.failed(), empty = health.empty(), "read threshold reached");
            return SessionEnd::Lost(reason);
        }
    }
}

async fn handle_line<S, C>(shared: &Shared<S, C>, conn: &C::Connection, dispatcher: &Dispatcher, line: &str)
where
    S: EventSink,
    C: Connector,
{
    debug!(line, "received");

    let msg = match IrcMessage::parse(line) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(error = %e, "skipping line");
            return;
        }
    };
    trace!(%msg, "parsed");

    for action in dispatcher.dispatch(&msg, line, &shared.sink) {
        match action {
            Action::Enqueue(message) => {
                shared.queue.enqueue(message);
            }
            Action::Register => register(shared, conn).await,
            Action::MarkRegistered => shared.registered.store(true, Ordering::Release),
            Action::Disconnect => shared.request_disconnect().await,
        }
    }
}

/// Sends USER and NICK unless the server already welcomed us.
async fn register<S, C>(shared: &Shared<S, C>, conn: &C::Connection)
where
    S: EventSink,
    C: Connector,
{
    if shared.registered.load(Ordering::Acquire) {
        debug!("already registered, skipping");
        return;
    }

    let config = &shared.config;
    let ident = format!(
        "{}{}",
        config.ident_prefix,
        rand::rng().random_range(10_000..=99_999)
    );
    info!(nick = %config.player_name, %ident, "registering");

    for line in [
        outbound::user(&ident, &config.real_name()),
        outbound::nick(&config.player_name),
    ] {
        if let Err(e) = send_line(conn, &line).await {
            // The receive loop will notice a dead link on its own.
            warn!(error = %e, "failed to send registration");
            return;
        }
    }
}

/// Drains the outbound queue while the connection is up.
async fn send_loop<S, C>(shared: Arc<Shared<S, C>>, conn: Arc<C::Connection>)
where
    S: EventSink,
    C: Connector,
{
    let delay = shared.config.send_delay();

    while shared.state.get() == ConnectionState::Connected {
        let Some(message) = shared.queue.drain() else {
            time::sleep(SEND_IDLE_POLL).await;
            continue;
        };
        if let Err(e) = send_line(&*conn, &message.payload).await {
            warn!(error = %e, "failed to send queued message");
        }
        time::sleep(delay).await;
    }

    shared.queue.close();
    debug!(conn_id = %conn.id(), "send loop exited");
}

/// Enqueues a PING whenever the server has been silent for a while.
async fn keepalive_loop<S, C>(shared: Arc<Shared<S, C>>, activity: Arc<Notify>)
where
    S: EventSink,
    C: Connector,
{
    let mut watchdog = Watchdog::new(shared.config.keepalive());
    loop {
        tokio::select! {
            () = activity.notified() => watchdog.rearm(),
            fire = watchdog.wait_for_fire() => {
                let token = ping_token();
                debug!(fire = fire.fire, silent_for = ?fire.silent_for, %token, "sending keepalive");
                shared.queue.enqueue(QueuedMessage::system(outbound::ping(&token)));
            }
        }
    }
}

/// Writes one line with its terminator.
pub(crate) async fn send_line<T: Connection>(conn: &T, line: &str) -> Result<(), TransportError> {
    debug!(line, "sending");
    conn.write(&encode_line(line)).await
}

async fn close_quietly<T: Connection>(conn: &T) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "close failed");
    }
}
