//! Stream-to-line framing.
//!
//! A TCP read hands us whatever bytes happened to arrive: half a line,
//! three lines and a bit, or a multi-byte character cut in two. The types
//! here turn that stream back into complete protocol lines.
//!
//! ```text
//! bytes ──→ LineDecoder ──→ text ──→ LineFramer ──→ lines
//! ```
//!
//! Both keep a small carry-over buffer between calls. Neither ever drops
//! data or emits a line twice; both are reset by being recreated for each
//! new connection.

use std::borrow::Cow;

use tracing::debug;

/// Line terminator appended to every outbound line.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Encodes one outbound line: the text followed by `\r\n`, as UTF-8.
pub fn encode_line(line: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(line.len() + LINE_TERMINATOR.len());
    bytes.extend_from_slice(line.as_bytes());
    bytes.extend_from_slice(LINE_TERMINATOR.as_bytes());
    bytes
}

// ---------------------------------------------------------------------------
// LineFramer
// ---------------------------------------------------------------------------

/// Reassembles `\n`-terminated lines from text chunks of arbitrary size.
///
/// The only state is the "overflow": the trailing fragment of the last
/// chunk that has not seen its terminator yet. Each call to
/// [`push`](Self::push) prepends it to the new chunk.
///
/// ## Example
///
/// ```rust
/// use lobbylink_protocol::LineFramer;
///
/// let mut framer = LineFramer::new();
/// assert!(framer.push("PING :ab").is_empty());
/// assert_eq!(framer.push("c\r\nNOTI"), vec!["PING :abc".to_string()]);
/// assert_eq!(framer.pending(), "NOTI");
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineFramer {
    overflow: String,
}

impl LineFramer {
    /// Creates a framer with an empty overflow buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every line it completes, in order.
    ///
    /// Lines are returned without their terminator; a `\r` before the
    /// `\n` is stripped as well. Empty lines are returned as empty strings.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        let mut data = std::mem::take(&mut self.overflow);
        data.push_str(chunk);

        let mut lines = Vec::new();
        let mut rest = data.as_str();
        while let Some(end) = rest.find('\n') {
            lines.push(rest[..end].trim_end_matches('\r').to_owned());
            rest = &rest[end + 1..];
        }
        self.overflow = rest.to_owned();

        lines
    }

    /// The buffered fragment still waiting for its terminator.
    pub fn pending(&self) -> &str {
        &self.overflow
    }

    /// Discards the buffered fragment.
    pub fn reset(&mut self) {
        self.overflow.clear();
    }
}

// ---------------------------------------------------------------------------
// LineDecoder
// ---------------------------------------------------------------------------

/// Decodes a byte stream as UTF-8 without splitting characters.
///
/// If a read ends in the middle of a multi-byte sequence, the incomplete
/// tail is held back and completed by the next read. Sequences that are
/// actually invalid are replaced with U+FFFD rather than failing.
#[derive(Debug, Default, Clone)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    /// Creates a decoder with nothing buffered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `bytes` (plus any held-back tail) as is complete.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let split = incomplete_tail_start(&self.pending);
        let text = match String::from_utf8_lossy(&self.pending[..split]) {
            Cow::Borrowed(valid) => valid.to_owned(),
            Cow::Owned(replaced) => {
                debug!(bytes = split, "replaced invalid UTF-8 in inbound data");
                replaced
            }
        };
        self.pending.drain(..split);
        text
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Index where a trailing, not-yet-complete UTF-8 sequence starts, or
/// `bytes.len()` if the buffer ends on a character boundary.
fn incomplete_tail_start(bytes: &[u8]) -> usize {
    let len = bytes.len();
    // A UTF-8 sequence is at most 4 bytes, so only the last 3 can start
    // an incomplete one.
    for back in 1..=len.min(3) {
        let idx = len - back;
        let byte = bytes[idx];
        if byte & 0xC0 == 0x80 {
            // Continuation byte: keep looking for the lead byte.
            continue;
        }
        let needed = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return len,
        };
        return if back < needed { idx } else { len };
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = ":irc.server.net 001 Guest :Welcome\r\nPING :abc123\r\n:a!b@c PRIVMSG #lobby :hi there\n";

    fn expected_sample_lines() -> Vec<String> {
        vec![
            ":irc.server.net 001 Guest :Welcome".to_string(),
            "PING :abc123".to_string(),
            ":a!b@c PRIVMSG #lobby :hi there".to_string(),
        ]
    }

    #[test]
    fn test_push_single_complete_line() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("PING :x\r\n"), vec!["PING :x"]);
        assert_eq!(framer.pending(), "");
    }

    #[test]
    fn test_push_multiple_lines_keeps_every_character() {
        // Each non-final line must keep its last character.
        let mut framer = LineFramer::new();
        let lines = framer.push("AB\r\nCD\r\nEF\r\n");
        assert_eq!(lines, vec!["AB", "CD", "EF"]);
    }

    #[test]
    fn test_push_partial_line_is_buffered() {
        let mut framer = LineFramer::new();
        assert!(framer.push("PING :ab").is_empty());
        assert_eq!(framer.pending(), "PING :ab");
        assert_eq!(framer.push("c\r\n"), vec!["PING :abc"]);
        assert_eq!(framer.pending(), "");
    }

    #[test]
    fn test_push_split_between_cr_and_lf() {
        let mut framer = LineFramer::new();
        assert!(framer.push("PING :x\r").is_empty());
        assert_eq!(framer.push("\nPONG"), vec!["PING :x"]);
        assert_eq!(framer.pending(), "PONG");
    }

    #[test]
    fn test_push_bare_lf_terminator() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("A\nB\n"), vec!["A", "B"]);
    }

    #[test]
    fn test_push_empty_lines_are_emitted() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("\r\n\nX\r\n"), vec!["", "", "X"]);
    }

    #[test]
    fn test_push_every_two_way_split_yields_same_lines() {
        for cut in 0..=SAMPLE.len() {
            let mut framer = LineFramer::new();
            let mut lines = framer.push(&SAMPLE[..cut]);
            lines.extend(framer.push(&SAMPLE[cut..]));
            assert_eq!(lines, expected_sample_lines(), "cut at {cut}");
            assert_eq!(framer.pending(), "");
        }
    }

    #[test]
    fn test_push_every_three_way_split_yields_same_lines() {
        for a in 0..=SAMPLE.len() {
            for b in a..=SAMPLE.len() {
                let mut framer = LineFramer::new();
                let mut lines = framer.push(&SAMPLE[..a]);
                lines.extend(framer.push(&SAMPLE[a..b]));
                lines.extend(framer.push(&SAMPLE[b..]));
                assert_eq!(lines, expected_sample_lines(), "cuts at {a},{b}");
            }
        }
    }

    #[test]
    fn test_push_byte_at_a_time() {
        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for ch in SAMPLE.chars() {
            lines.extend(framer.push(ch.encode_utf8(&mut [0; 4])));
        }
        assert_eq!(lines, expected_sample_lines());
    }

    #[test]
    fn test_reset_discards_overflow() {
        let mut framer = LineFramer::new();
        framer.push("half a li");
        framer.reset();
        assert_eq!(framer.push("ne\r\n"), vec!["ne"]);
    }

    #[test]
    fn test_encode_line_appends_crlf() {
        assert_eq!(encode_line("NICK Guest"), b"NICK Guest\r\n".to_vec());
    }

    #[test]
    fn test_decode_ascii_passes_through() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.decode(b"PING :x\r\n"), "PING :x\r\n");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_decode_holds_back_split_character() {
        let bytes = "héllo €".as_bytes();
        // Cut inside the 3-byte euro sign.
        let cut = bytes.len() - 1;
        let mut decoder = LineDecoder::new();
        let first = decoder.decode(&bytes[..cut]);
        assert_eq!(first, "héllo ");
        assert_eq!(decoder.pending_len(), 2);
        let second = decoder.decode(&bytes[cut..]);
        assert_eq!(format!("{first}{second}"), "héllo €");
    }

    #[test]
    fn test_decode_every_split_of_multibyte_text() {
        let text = "ü€😀 ok";
        let bytes = text.as_bytes();
        for cut in 0..=bytes.len() {
            let mut decoder = LineDecoder::new();
            let mut out = decoder.decode(&bytes[..cut]);
            out.push_str(&decoder.decode(&bytes[cut..]));
            assert_eq!(out, text, "cut at {cut}");
        }
    }

    #[test]
    fn test_decode_invalid_bytes_are_replaced() {
        let mut decoder = LineDecoder::new();
        let out = decoder.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }
}
