//! Builders for the fixed outbound commands the client itself sends.
//!
//! Game payloads and chat lines arrive fully formed from the layers above;
//! only the connection-management commands are built here.

/// `USER <ident> 0 * :<realname>`: first half of registration.
pub fn user(ident: &str, realname: &str) -> String {
    format!("USER {ident} 0 * :{realname}")
}

/// `NICK <nickname>`: second half of registration.
pub fn nick(nickname: &str) -> String {
    format!("NICK {nickname}")
}

/// `QUIT`: announces an intentional disconnect.
pub fn quit() -> String {
    "QUIT".to_owned()
}

/// `PING <token>`: keepalive probe.
pub fn ping(token: &str) -> String {
    format!("PING {token}")
}

/// `PONG [token]`: reply to a server `PING`, echoing its token.
pub fn pong(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("PONG {token}"),
        None => "PONG".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IrcMessage;

    #[test]
    fn test_user_line_parses_back_to_four_params() {
        let line = user("DTA12345", "1.0 DTA CnCNet");
        assert_eq!(line, "USER DTA12345 0 * :1.0 DTA CnCNet");
        let msg = IrcMessage::parse(&line).unwrap();
        assert_eq!(msg.params, vec!["DTA12345", "0", "*", "1.0 DTA CnCNet"]);
    }

    #[test]
    fn test_pong_with_and_without_token() {
        assert_eq!(pong(Some("abc123")), "PONG abc123");
        assert_eq!(pong(None), "PONG");
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(nick("Guest"), "NICK Guest");
        assert_eq!(quit(), "QUIT");
        assert_eq!(ping("LAG123456"), "PING LAG123456");
    }
}
