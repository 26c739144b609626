//! The `EventSink` trait, the extension point of the lobby layer.
//!
//! This is the single trait the application implements to learn what is
//! happening on the chat connection. The client calls these methods at
//! the right time; the implementor decides what to show or do.

/// Receives connection lifecycle events and parsed protocol events.
///
/// Every method has an empty default body, so an implementor only writes
/// the ones it cares about. Calls are fire-and-forget: they are made from
/// the client's background tasks and should return quickly. Long work
/// belongs on the implementor's own task.
///
/// Channel names are passed exactly as received (including the leading
/// `#`); user names are bare nicknames.
pub trait EventSink: Send + Sync + 'static {
    // -- Connection lifecycle --

    /// A connection attempt to the server with this display name is starting.
    fn on_attempted_server_changed(&self, _server_name: &str) {}

    /// A TCP connection is up; registration is about to be sent.
    fn on_connected(&self) {}

    /// Every endpoint and port was tried without success.
    fn on_connect_attempt_failed(&self) {}

    /// An intentional disconnect has completed.
    fn on_disconnected(&self) {}

    /// The connection was lost unexpectedly.
    fn on_connection_lost(&self, _reason: &str) {}

    /// Teardown after a loss is complete; the caller may connect again.
    fn on_reconnect_attempt(&self) {}

    // -- Server replies --

    /// Registration succeeded (`001`).
    fn on_welcome_message_received(&self, _text: &str) {}

    /// An informational or rejection message for display.
    fn on_generic_server_message_received(&self, _text: &str) {}

    /// `user` is away with `reason` (`301`).
    fn on_away_message_received(&self, _user: &str, _reason: &str) {}

    /// Topic of a channel we are in (`332`).
    fn on_channel_topic_received(&self, _channel: &str, _topic: &str) {}

    /// Names of the users in a channel (`353`).
    fn on_user_list_received(&self, _channel: &str, _usernames: &[String]) {}

    /// One line of a WHO reply (`352`).
    fn on_who_reply_received(&self, _username: &str, _extra_info: &str) {}

    /// A join failed because the channel is full (`471`).
    fn on_channel_full(&self, _channel: &str) {}

    /// A join failed because the channel key was wrong or missing (`475`).
    fn on_incorrect_channel_password(&self, _channel: &str) {}

    // -- Messages from other users --

    /// A CTCP payload (delimiters stripped) sent to `channel` by `sender`.
    fn on_ctcp_parsed(&self, _channel: &str, _sender: &str, _payload: &str) {}

    /// A NOTICE from another user.
    fn on_notice_message_parsed(&self, _text: &str, _sender: &str) {}

    /// `user` joined `channel`; `hostmask` is the `user@host` part.
    fn on_user_joined_channel(&self, _channel: &str, _user: &str, _hostmask: &str) {}

    /// `user` left `channel`.
    fn on_user_left_channel(&self, _channel: &str, _user: &str) {}

    /// `user` disconnected from the network.
    fn on_user_quit(&self, _user: &str) {}

    /// A message to a channel.
    fn on_chat_message_received(&self, _channel: &str, _user: &str, _text: &str) {}

    /// A message addressed to the local player.
    fn on_private_message_received(&self, _user: &str, _text: &str) {}

    /// `user` changed the modes of `channel`.
    fn on_channel_modes_changed(&self, _user: &str, _channel: &str, _modes: &str) {}

    /// `user` was kicked from `channel`.
    fn on_user_kicked(&self, _channel: &str, _user: &str) {}

    /// The server sent `ERROR`; `text` is the raw line.
    fn on_error_received(&self, _text: &str) {}
}

/// A sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}
