//! End-to-end test over real TCP against a minimal scripted server.

use std::sync::Mutex;
use std::time::Duration;

use lobbylink::prelude::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

#[derive(Default)]
struct WelcomeSink {
    welcome: Mutex<Option<String>>,
    disconnected: Mutex<bool>,
}

impl EventSink for WelcomeSink {
    fn on_welcome_message_received(&self, text: &str) {
        *self.welcome.lock().unwrap() = Some(text.to_owned());
    }

    fn on_disconnected(&self) {
        *self.disconnected.lock().unwrap() = true;
    }
}

async fn next_line<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> String {
    let mut line = String::new();
    tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("line in time")
        .expect("read ok");
    line
}

#[tokio::test]
async fn test_full_session_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = ClientConfig {
        player_name: "Tanya".into(),
        read_timeout_ms: 200,
        endpoints: EndpointDirectory::new(vec![Endpoint::new("127.0.0.1", "Local", &[port])]),
        ..ClientConfig::default()
    };
    let client = LobbyClient::new(config, WelcomeSink::default()).unwrap();
    let handle = client.connect_async().unwrap();

    let (stream, _) = listener.accept().await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let user = next_line(&mut reader).await;
    assert!(user.starts_with("USER DTA"), "{user:?}");
    assert!(user.ends_with(" 0 * :1.0 DTA CnCNet\r\n"), "{user:?}");
    assert_eq!(next_line(&mut reader).await, "NICK Tanya\r\n");

    write_half
        .write_all(b":irc.local 001 Tanya :Welcome aboard\r\nPING :abc123\r\n")
        .await
        .unwrap();
    assert_eq!(next_line(&mut reader).await, "PONG abc123\r\n");
    assert_eq!(
        client.sink().welcome.lock().unwrap().as_deref(),
        Some("irc.local: Welcome aboard")
    );

    assert!(client.queue_message("JOIN #lobby", MessageType::Standard, 0));
    assert_eq!(next_line(&mut reader).await, "JOIN #lobby\r\n");

    client.disconnect().await;
    assert_eq!(next_line(&mut reader).await, "QUIT\r\n");
    // The client shut down its write half.
    assert_eq!(next_line(&mut reader).await, "");

    handle.await.unwrap();
    assert!(*client.sink().disconnected.lock().unwrap());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_refused_port_falls_over_to_next() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let good = listener.local_addr().unwrap().port();

    // Grab a free port and release it so nothing is listening there.
    let closed = {
        let spare = TcpListener::bind("127.0.0.1:0").await.unwrap();
        spare.local_addr().unwrap().port()
    };

    let config = ClientConfig {
        read_timeout_ms: 200,
        endpoints: EndpointDirectory::new(vec![Endpoint::new(
            "127.0.0.1",
            "Local",
            &[closed, good],
        )]),
        ..ClientConfig::default()
    };
    let client = LobbyClient::new(config, WelcomeSink::default()).unwrap();
    let handle = client.connect_async().unwrap();

    let (stream, _) = listener.accept().await.unwrap();
    let mut reader = BufReader::new(stream);
    assert!(next_line(&mut reader).await.starts_with("USER "));

    client.disconnect().await;
    handle.await.unwrap();
}
