//! Tracing setup for applications embedding the client.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::LobbyError;

/// Crate targets covered by the fallback filter.
const TARGETS: &[&str] = &[
    "lobbylink",
    "lobbylink_transport",
    "lobbylink_protocol",
    "lobbylink_queue",
    "lobbylink_keepalive",
    "lobbylink_dispatch",
];

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise every lobbylink crate logs at
/// `level` (`"info"`, `"debug"`, ...). Raw protocol lines are logged at
/// `debug`.
///
/// # Errors
/// Returns [`LobbyError::Logging`] if a global subscriber is already set.
///
/// ```ignore
/// lobbylink::logging::init_logging("debug")?;
/// ```
pub fn init_logging(level: &str) -> Result<(), LobbyError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directives(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| LobbyError::Logging(e.to_string()))
}

fn fallback_directives(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
