use std::path::Path;
use std::time::Duration;

use lobbylink::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Pause before connecting again after a loss or a failed attempt.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

enum Signal {
    Welcome,
    Retry,
}

/// Prints events and forwards the ones the main loop reacts to.
struct ConsoleSink {
    signals: mpsc::UnboundedSender<Signal>,
}

impl ConsoleSink {
    fn signal(&self, signal: Signal) {
        // The receiver only goes away while the program exits.
        let _ = self.signals.send(signal);
    }
}

impl EventSink for ConsoleSink {
    fn on_attempted_server_changed(&self, server_name: &str) {
        println!("-- trying {server_name}");
    }
    fn on_connected(&self) {
        println!("-- connected");
    }
    fn on_connect_attempt_failed(&self) {
        println!("-- no server reachable");
        self.signal(Signal::Retry);
    }
    fn on_disconnected(&self) {
        println!("-- disconnected");
    }
    fn on_connection_lost(&self, reason: &str) {
        println!("-- connection lost: {reason}");
    }
    fn on_reconnect_attempt(&self) {
        self.signal(Signal::Retry);
    }
    fn on_welcome_message_received(&self, text: &str) {
        println!("{text}");
        self.signal(Signal::Welcome);
    }
    fn on_generic_server_message_received(&self, text: &str) {
        println!("{text}");
    }
    fn on_channel_topic_received(&self, channel: &str, topic: &str) {
        println!("[{channel}] topic: {topic}");
    }
    fn on_user_list_received(&self, channel: &str, usernames: &[String]) {
        println!("[{channel}] users: {}", usernames.join(" "));
    }
    fn on_user_joined_channel(&self, channel: &str, user: &str, _hostmask: &str) {
        println!("[{channel}] {user} joined");
    }
    fn on_user_left_channel(&self, channel: &str, user: &str) {
        println!("[{channel}] {user} left");
    }
    fn on_user_quit(&self, user: &str) {
        println!("-- {user} quit");
    }
    fn on_chat_message_received(&self, channel: &str, user: &str, text: &str) {
        println!("[{channel}] <{user}> {text}");
    }
    fn on_private_message_received(&self, user: &str, text: &str) {
        println!("*{user}* {text}");
    }
    fn on_notice_message_parsed(&self, text: &str, sender: &str) {
        println!("-{sender}- {text}");
    }
    fn on_channel_full(&self, channel: &str) {
        println!("-- {channel} is full");
    }
    fn on_incorrect_channel_password(&self, channel: &str) {
        println!("-- wrong password for {channel}");
    }
    fn on_error_received(&self, text: &str) {
        println!("!! {text}");
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Usage: `lobby-console [config.json] [#channel]`
///
/// Lines typed on stdin are sent to the channel. Ctrl-C leaves.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lobbylink::logging::init_logging("info")?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ClientConfig::load(Path::new(&path))?,
        None => ClientConfig::default(),
    };
    let channel = args.next().unwrap_or_else(|| "#cncnet".to_owned());

    let (signals, mut incoming) = mpsc::unbounded_channel();
    let client = LobbyClient::new(config, ConsoleSink { signals })?;
    let mut session = client.connect_async()?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("leaving");
                client.disconnect().await;
                break;
            }
            Some(signal) = incoming.recv() => match signal {
                Signal::Welcome => {
                    client.queue_message(format!("JOIN {channel}"), MessageType::Standard, 0);
                }
                Signal::Retry => {
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    match client.connect_async() {
                        Ok(handle) => session = handle,
                        Err(e) => warn!(error = %e, "reconnect refused"),
                    }
                }
            },
            line = stdin.next_line() => match line? {
                Some(text) if !text.trim().is_empty() => {
                    let sent = client.queue_message(
                        format!("PRIVMSG {channel} :{text}"),
                        MessageType::Chat,
                        0,
                    );
                    if !sent {
                        println!("-- not connected");
                    }
                }
                Some(_) => {}
                None => {
                    client.disconnect().await;
                    break;
                }
            },
        }
    }

    session.await?;
    Ok(())
}
