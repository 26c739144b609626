//! End-to-end framing tests: raw byte chunks through the decoder and
//! framer into parsed messages, the way the receive loop uses them.

use lobbylink_protocol::{IrcMessage, LineDecoder, LineFramer};

/// Feeds `chunks` through a fresh decoder/framer pair and parses every
/// resulting line.
fn run(chunks: &[&[u8]]) -> Vec<IrcMessage> {
    let mut decoder = LineDecoder::new();
    let mut framer = LineFramer::new();
    let mut out = Vec::new();
    for chunk in chunks {
        let text = decoder.decode(chunk);
        for line in framer.push(&text) {
            out.push(IrcMessage::parse(&line).expect("line should parse"));
        }
    }
    out
}

#[test]
fn test_burst_of_numerics_in_one_read() {
    let data = b":s 001 Guest :Welcome\r\n:s 002 Guest :Your host\r\n:s 003 Guest :Created\r\n";
    let msgs = run(&[data]);
    let commands: Vec<_> = msgs.iter().map(|m| m.command.as_str()).collect();
    assert_eq!(commands, vec!["001", "002", "003"]);
    assert_eq!(msgs[1].params, vec!["Guest", "Your host"]);
}

#[test]
fn test_chunk_boundary_inside_multibyte_nickname() {
    let line = ":Jürgen!u@h PRIVMSG #lobby :grüße\r\n".as_bytes();
    // Split right after the first byte of 'ü'.
    let cut = line.iter().position(|&b| b == 0xC3).unwrap() + 1;
    let msgs = run(&[&line[..cut], &line[cut..]]);
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].sender_nick(), Some("Jürgen"));
    assert_eq!(msgs[0].params, vec!["#lobby", "grüße"]);
}

#[test]
fn test_every_byte_split_of_a_session_transcript() {
    let transcript: &[u8] = b":s 001 G :Hi\r\nPING :tok\r\n:n!u@h JOIN #a\r\n";
    for cut in 0..=transcript.len() {
        let msgs = run(&[&transcript[..cut], &transcript[cut..]]);
        let commands: Vec<_> = msgs.iter().map(|m| m.command.clone()).collect();
        assert_eq!(commands, vec!["001", "PING", "JOIN"], "cut at {cut}");
    }
}
