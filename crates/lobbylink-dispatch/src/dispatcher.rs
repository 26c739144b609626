//! Dispatcher: turns parsed lines into sink events and client actions.
//!
//! The dispatcher is stateless apart from the local nickname. Anything
//! that needs the connection (answering a PING, resending registration,
//! dropping the link) comes back as an [`Action`] for the supervisor to
//! carry out, so this module never touches the network.

use lobbylink_protocol::{ctcp_payload, outbound, IrcMessage, ProtocolError, CTCP_DELIMITER};
use lobbylink_queue::QueuedMessage;
use tracing::{debug, trace, warn};

use crate::{CommandKind, DispatchError, EventSink};

/// Work the connection supervisor must perform after a line is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Put a message on the outbound queue.
    Enqueue(QueuedMessage),
    /// Send the USER and NICK lines again.
    Register,
    /// The server accepted registration.
    MarkRegistered,
    /// Drop the connection as if the user had asked to disconnect.
    Disconnect,
}

/// Routes each recognised command to its handler.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    local_name: String,
}

impl Dispatcher {
    /// Creates a dispatcher for the player with nickname `local_name`.
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
        }
    }

    /// The nickname private messages and numeric replies are matched against.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Handles one parsed line.
    ///
    /// `raw` is the line as received; some events report it verbatim.
    /// Unknown commands are ignored. A line that lacks a parameter its
    /// handler needs is logged and dropped, and no event is emitted for it.
    pub fn dispatch<S>(&self, msg: &IrcMessage, raw: &str, sink: &S) -> Vec<Action>
    where
        S: EventSink + ?Sized,
    {
        let Some(kind) = CommandKind::lookup(msg) else {
            trace!(command = %msg.command, "ignoring unhandled command");
            return Vec::new();
        };

        match self.handle(kind, msg, raw, sink) {
            Ok(actions) => actions,
            Err(e) => {
                warn!(error = %e, line = raw, "dropping malformed line");
                Vec::new()
            }
        }
    }

    fn handle<S>(
        &self,
        kind: CommandKind,
        msg: &IrcMessage,
        raw: &str,
        sink: &S,
    ) -> Result<Vec<Action>, DispatchError>
    where
        S: EventSink + ?Sized,
    {
        // A plain CTCP request goes down the NOTICE path, which copes with
        // a prefix that names no user.
        if kind == CommandKind::Privmsg && is_plain_ctcp(msg) {
            self.notice(msg, sink)?;
            return Ok(Vec::new());
        }

        let sender = if kind.requires_sender() {
            msg.sender_nick().ok_or_else(|| DispatchError::MissingSender {
                command: msg.command.clone(),
            })?
        } else {
            ""
        };
        let prefix = msg.prefix.as_str();

        match kind {
            CommandKind::Welcome => {
                let text = format!("{prefix}: {}", msg.param(1)?);
                sink.on_welcome_message_received(&text);
                return Ok(vec![Action::MarkRegistered]);
            }
            CommandKind::ServerMessage => {
                let text = format!("{prefix}: {}", msg.param(1)?);
                sink.on_generic_server_message_received(&text);
            }
            CommandKind::ServerMessagePair => {
                let text = format!("{prefix}: {} {}", msg.param(1)?, msg.param(2)?);
                sink.on_generic_server_message_received(&text);
            }
            CommandKind::Away => {
                if self.addressed_to_us(msg)? {
                    sink.on_away_message_received(msg.param(1)?, msg.param(2)?);
                }
            }
            CommandKind::Topic => {
                if self.addressed_to_us(msg)? {
                    let channel = msg.param(1)?;
                    // An empty topic arrives as a bare trailing ":".
                    let topic = msg.params.get(2).map_or("", String::as_str);
                    sink.on_channel_topic_received(channel, topic);
                }
            }
            CommandKind::Names => {
                if self.addressed_to_us(msg)? {
                    let channel = msg.param(2)?;
                    let users: Vec<String> = msg
                        .param(3)?
                        .split_whitespace()
                        .map(str::to_owned)
                        .collect();
                    sink.on_user_list_received(channel, &users);
                }
            }
            CommandKind::WhoReply => {
                sink.on_who_reply_received(msg.param(5)?, msg.param(7)?);
            }
            CommandKind::NicknameInUse => {
                let text = format!("{prefix}: {}: {}", msg.param(1)?, msg.param(2)?);
                sink.on_generic_server_message_received(&text);
                debug!(nick = %self.local_name, "nickname in use, disconnecting");
                return Ok(vec![Action::Disconnect]);
            }
            CommandKind::NotRegistered => {
                sink.on_generic_server_message_received(raw);
                return Ok(vec![Action::Register]);
            }
            CommandKind::ChannelFull => sink.on_channel_full(msg.param(1)?),
            CommandKind::BadChannelKey => sink.on_incorrect_channel_password(msg.param(1)?),
            CommandKind::Notice => self.notice(msg, sink)?,
            CommandKind::Join => {
                let channel = msg.param(0)?;
                let hostmask = msg.sender_host().unwrap_or_default();
                sink.on_user_joined_channel(channel, sender, hostmask);
            }
            CommandKind::Part => sink.on_user_left_channel(msg.param(0)?, sender),
            CommandKind::Quit => sink.on_user_quit(sender),
            CommandKind::Privmsg => self.privmsg(msg, sender, sink)?,
            CommandKind::Mode => {
                sink.on_channel_modes_changed(sender, msg.param(0)?, msg.param(1)?);
            }
            CommandKind::Kick => sink.on_user_kicked(msg.param(0)?, msg.param(1)?),
            CommandKind::Error => sink.on_error_received(raw),
            CommandKind::Ping => {
                let token = msg.params.first().map(String::as_str);
                trace!(?token, "answering server ping");
                let pong = QueuedMessage::system(outbound::pong(token));
                return Ok(vec![Action::Enqueue(pong)]);
            }
        }

        Ok(Vec::new())
    }

    /// Whether the first parameter of a reply is our own nickname.
    fn addressed_to_us(&self, msg: &IrcMessage) -> Result<bool, DispatchError> {
        Ok(msg.param(0)? == self.local_name)
    }

    fn notice<S>(&self, msg: &IrcMessage, sink: &S) -> Result<(), DispatchError>
    where
        S: EventSink + ?Sized,
    {
        let Some(nick) = msg.sender_nick() else {
            let text = format!("{} {}", msg.prefix, msg.params.join(" "));
            sink.on_generic_server_message_received(&text);
            return Ok(());
        };

        if let Some(payload) = msg.params.get(1).and_then(|p| ctcp_payload(p)) {
            sink.on_ctcp_parsed(msg.param(0)?, nick, payload);
            return Ok(());
        }

        let text = msg.last_param().ok_or_else(|| missing(msg, 0))?;
        sink.on_notice_message_parsed(text, nick);
        Ok(())
    }

    fn privmsg<S>(&self, msg: &IrcMessage, sender: &str, sink: &S) -> Result<(), DispatchError>
    where
        S: EventSink + ?Sized,
    {
        let Some((text, recipients)) = msg.params.split_last() else {
            return Err(missing(msg, 0));
        };

        for recipient in recipients {
            if recipient.starts_with('#') {
                sink.on_chat_message_received(recipient, sender, text);
            } else if *recipient == self.local_name {
                sink.on_private_message_received(sender, text);
            }
        }
        Ok(())
    }
}

fn missing(msg: &IrcMessage, index: usize) -> DispatchError {
    ProtocolError::MissingParameter {
        command: msg.command.clone(),
        index,
    }
    .into()
}

/// A CTCP request other than ACTION, which is shown as chat instead.
fn is_plain_ctcp(msg: &IrcMessage) -> bool {
    msg.params
        .get(1)
        .is_some_and(|text| text.starts_with(CTCP_DELIMITER) && !text.contains("ACTION"))
}
