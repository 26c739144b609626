//! A single parsed protocol line.
//!
//! IRC lines follow a small grammar:
//!
//! ```text
//! [":" prefix " "] command { " " middle } [" :" trailing]
//! ```
//!
//! The prefix names the sender (`nick!user@host` or a server name), the
//! command is a word (`PRIVMSG`) or a three-digit numeric reply (`001`),
//! and the trailing parameter is the only one allowed to contain spaces.

use std::fmt;

use crate::ProtocolError;

/// The control byte that brackets a CTCP payload inside NOTICE/PRIVMSG.
pub const CTCP_DELIMITER: char = '\x01';

/// One line decomposed into prefix, command and parameters.
///
/// Produced per received line, handed to the dispatcher, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IrcMessage {
    /// Sender prefix without the leading `:`; empty when absent.
    pub prefix: String,
    /// Textual command or numeric reply code, exactly as received.
    pub command: String,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parses one line (without its terminator).
    ///
    /// Repeated spaces between middle parameters are collapsed. An empty
    /// trailing parameter (`"... :"`) is not included in `params`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyCommand`] when nothing is left to
    /// act as the command, e.g. for a blank line.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use lobbylink_protocol::IrcMessage;
    ///
    /// let msg = IrcMessage::parse(":irc.server.net 001 Guest :Welcome to the network").unwrap();
    /// assert_eq!(msg.prefix, "irc.server.net");
    /// assert_eq!(msg.command, "001");
    /// assert_eq!(msg.params, vec!["Guest", "Welcome to the network"]);
    /// ```
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (prefix, rest) = match line.strip_prefix(':') {
            Some(after_colon) => match after_colon.find(' ') {
                Some(end) => (&after_colon[..end], &after_colon[end..]),
                None => (after_colon, ""),
            },
            None => ("", line),
        };

        let (middle, trailing) = match rest.find(" :") {
            Some(start) => (&rest[..start], Some(&rest[start + 2..])),
            None => (rest, None),
        };

        let mut tokens = middle.split(' ').filter(|t| !t.is_empty());
        let Some(command) = tokens.next() else {
            return Err(ProtocolError::EmptyCommand {
                line: line.to_owned(),
            });
        };

        let mut params: Vec<String> = tokens.map(str::to_owned).collect();
        if let Some(trailing) = trailing.filter(|t| !t.is_empty()) {
            params.push(trailing.to_owned());
        }

        Ok(Self {
            prefix: prefix.to_owned(),
            command: command.to_owned(),
            params,
        })
    }

    /// Returns the parameter at `index` (0-based).
    ///
    /// # Errors
    /// Returns [`ProtocolError::MissingParameter`] if the line is shorter.
    pub fn param(&self, index: usize) -> Result<&str, ProtocolError> {
        self.params
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ProtocolError::MissingParameter {
                command: self.command.clone(),
                index,
            })
    }

    /// The last parameter, which is the trailing text when one was sent.
    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// The numeric reply code, if the command is one.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.bytes().all(|b| b.is_ascii_digit()) {
            self.command.parse().ok()
        } else {
            None
        }
    }

    /// The nickname part of a `nick!user@host` prefix.
    ///
    /// Returns `None` for server prefixes, which carry no `!`.
    pub fn sender_nick(&self) -> Option<&str> {
        self.prefix.split_once('!').map(|(nick, _)| nick)
    }

    /// The `user@host` part of a `nick!user@host` prefix.
    pub fn sender_host(&self) -> Option<&str> {
        self.prefix.split_once('!').map(|(_, host)| host)
    }
}

impl fmt::Display for IrcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.command)?;
        for param in &self.params {
            write!(f, " {param},")?;
        }
        Ok(())
    }
}

/// Returns the CTCP payload if `text` is a CTCP-delimited message.
///
/// The leading delimiter is required; the trailing one is stripped when
/// present.
pub fn ctcp_payload(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(CTCP_DELIMITER)?;
    Some(inner.strip_suffix(CTCP_DELIMITER).unwrap_or(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_numeric_and_trailing() {
        let msg =
            IrcMessage::parse(":irc.server.net 001 Guest :Welcome to the network")
                .unwrap();
        assert_eq!(msg.prefix, "irc.server.net");
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params, vec!["Guest", "Welcome to the network"]);
        assert_eq!(msg.numeric(), Some(1));
    }

    #[test]
    fn test_parse_no_prefix_ping() {
        let msg = IrcMessage::parse("PING :abc123").unwrap();
        assert_eq!(msg.prefix, "");
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["abc123"]);
        assert_eq!(msg.numeric(), None);
    }

    #[test]
    fn test_parse_without_trailing_splits_everything() {
        let msg = IrcMessage::parse(":nick!user@host JOIN #lobby").unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.params, vec!["#lobby"]);
    }

    #[test]
    fn test_parse_collapses_repeated_spaces() {
        let msg = IrcMessage::parse("MODE  #chan   +k  key").unwrap();
        assert_eq!(msg.params, vec!["#chan", "+k", "key"]);
    }

    #[test]
    fn test_parse_trailing_keeps_inner_colons_and_spaces() {
        let msg = IrcMessage::parse(":a!b@c PRIVMSG #x :time is 12:30 : ok").unwrap();
        assert_eq!(msg.params, vec!["#x", "time is 12:30 : ok"]);
    }

    #[test]
    fn test_parse_empty_trailing_is_dropped() {
        let msg = IrcMessage::parse("TOPIC #x :").unwrap();
        assert_eq!(msg.params, vec!["#x"]);
    }

    #[test]
    fn test_parse_blank_line_is_empty_command() {
        assert!(matches!(
            IrcMessage::parse(""),
            Err(ProtocolError::EmptyCommand { .. })
        ));
    }

    #[test]
    fn test_parse_prefix_only_is_empty_command() {
        assert!(matches!(
            IrcMessage::parse(":irc.server.net"),
            Err(ProtocolError::EmptyCommand { .. })
        ));
    }

    #[test]
    fn test_parse_prefix_then_trailing_only_is_empty_command() {
        assert!(matches!(
            IrcMessage::parse(":irc.server.net :hello"),
            Err(ProtocolError::EmptyCommand { .. })
        ));
    }

    #[test]
    fn test_param_out_of_range_is_error() {
        let msg = IrcMessage::parse("KICK #x").unwrap();
        assert_eq!(msg.param(0).unwrap(), "#x");
        assert_eq!(
            msg.param(1).unwrap_err(),
            ProtocolError::MissingParameter {
                command: "KICK".into(),
                index: 1
            }
        );
    }

    #[test]
    fn test_sender_nick_and_host() {
        let msg = IrcMessage::parse(":Guest!~ident@10.0.0.1 QUIT :bye").unwrap();
        assert_eq!(msg.sender_nick(), Some("Guest"));
        assert_eq!(msg.sender_host(), Some("~ident@10.0.0.1"));

        let server = IrcMessage::parse(":irc.server.net NOTICE * :hi").unwrap();
        assert_eq!(server.sender_nick(), None);
    }

    #[test]
    fn test_numeric_rejects_mixed_text() {
        let msg = IrcMessage::parse("4x3 a").unwrap();
        assert_eq!(msg.numeric(), None);
        let msg = IrcMessage::parse("433 * Guest :in use").unwrap();
        assert_eq!(msg.numeric(), Some(433));
    }

    #[test]
    fn test_ctcp_payload_strips_delimiters() {
        assert_eq!(ctcp_payload("\x01VERSION\x01"), Some("VERSION"));
        assert_eq!(ctcp_payload("\x01GAME 1 2"), Some("GAME 1 2"));
        assert_eq!(ctcp_payload("plain"), None);
    }

    #[test]
    fn test_display_lists_params() {
        let msg = IrcMessage::parse(":p CMD a :b c").unwrap();
        assert_eq!(msg.to_string(), "p CMD a, b c,");
    }
}
