//! Client configuration with JSON persistence.

use std::path::Path;
use std::time::Duration;

use lobbylink_keepalive::KeepaliveConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::endpoint::EndpointDirectory;
use crate::error::ConfigError;

/// Everything the client reads at connect and registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Local nickname.
    pub player_name: String,
    /// First word of the registration real name.
    pub client_version: String,
    /// Second word of the registration real name.
    pub default_game: String,
    /// Last word of the registration real name.
    pub network_name: String,
    /// The USER ident is this prefix followed by five random digits.
    pub ident_prefix: String,
    /// Pause after each line the send loop writes.
    pub send_delay_ms: u64,
    /// Bound on each `(host, port)` connect attempt.
    pub connect_timeout_ms: u64,
    /// Bound on each read; the disconnect flag is checked in between.
    /// A read that hits it counts as a failed read.
    pub read_timeout_ms: u64,
    /// Consecutive failed (or empty) reads that end the connection.
    pub error_threshold: u32,
    /// Both keepalive delays must stay below
    /// `read_timeout_ms * error_threshold` so a PONG can arrive in time.
    pub keepalive_initial_secs: u64,
    pub keepalive_interval_secs: u64,
    /// Servers to try, in order.
    pub endpoints: EndpointDirectory,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "Guest".into(),
            client_version: "1.0".into(),
            default_game: "DTA".into(),
            network_name: "CnCNet".into(),
            ident_prefix: "DTA".into(),
            send_delay_ms: 10,
            connect_timeout_ms: 3000,
            read_timeout_ms: 1000,
            error_threshold: 30,
            keepalive_initial_secs: 20,
            keepalive_interval_secs: 20,
            endpoints: EndpointDirectory::default(),
        }
    }
}

impl ClientConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Reads and parses the JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    /// Checks the config and replaces unusable zero values with defaults.
    ///
    /// # Errors
    /// Rejects an empty player name, an empty endpoint directory and an
    /// endpoint without ports.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if let Some(ep) = self.endpoints.endpoints().iter().find(|ep| ep.ports.is_empty()) {
            return Err(ConfigError::NoPorts {
                host: ep.host.clone(),
            });
        }

        let defaults = Self::default();
        clamp_zero(&mut self.connect_timeout_ms, defaults.connect_timeout_ms, "connect_timeout_ms");
        clamp_zero(&mut self.read_timeout_ms, defaults.read_timeout_ms, "read_timeout_ms");
        clamp_zero(
            &mut self.keepalive_initial_secs,
            defaults.keepalive_initial_secs,
            "keepalive_initial_secs",
        );
        clamp_zero(
            &mut self.keepalive_interval_secs,
            defaults.keepalive_interval_secs,
            "keepalive_interval_secs",
        );
        if self.error_threshold == 0 {
            warn!(default = defaults.error_threshold, "error_threshold is zero, using default");
            self.error_threshold = defaults.error_threshold;
        }

        let budget_ms = self.silence_budget().as_millis();
        for (value, field) in [
            (&mut self.keepalive_initial_secs, "keepalive_initial_secs"),
            (&mut self.keepalive_interval_secs, "keepalive_interval_secs"),
        ] {
            if u128::from(*value) * 1000 >= budget_ms {
                let capped = u64::try_from(budget_ms * 2 / 3 / 1000).unwrap_or(u64::MAX).max(1);
                warn!(field, budget_ms = %budget_ms, capped, "keepalive slower than the read budget, shortening");
                *value = capped;
            }
        }
        Ok(self)
    }

    /// The registration real name: version, game and network.
    pub fn real_name(&self) -> String {
        format!(
            "{} {} {}",
            self.client_version, self.default_game, self.network_name
        )
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// How long the server may stay silent before the consecutive
    /// read timeouts end the connection.
    pub fn silence_budget(&self) -> Duration {
        self.read_timeout().saturating_mul(self.error_threshold)
    }

    pub fn keepalive(&self) -> KeepaliveConfig {
        KeepaliveConfig {
            initial_delay: Duration::from_secs(self.keepalive_initial_secs),
            interval: Duration::from_secs(self.keepalive_interval_secs),
        }
    }
}

fn clamp_zero(value: &mut u64, default: u64, field: &'static str) {
    if *value == 0 {
        warn!(field, default, "zero value in config, using default");
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;

    #[test]
    fn test_default_config_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.player_name, "Guest");
        assert_eq!(cfg.send_delay(), Duration::from_millis(10));
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.read_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.error_threshold, 30);
        assert_eq!(cfg.silence_budget(), Duration::from_secs(30));
        assert_eq!(cfg.keepalive(), KeepaliveConfig::every(Duration::from_secs(20)));
    }

    #[test]
    fn test_real_name_joins_version_game_network() {
        let cfg = ClientConfig {
            client_version: "2.5".into(),
            default_game: "YR".into(),
            ..ClientConfig::default()
        };
        assert_eq!(cfg.real_name(), "2.5 YR CnCNet");
    }

    #[test]
    fn test_from_json_str_partial_document_uses_defaults() {
        let cfg = ClientConfig::from_json_str(r#"{"player_name":"Tanya","send_delay_ms":250}"#)
            .unwrap();
        assert_eq!(cfg.player_name, "Tanya");
        assert_eq!(cfg.send_delay_ms, 250);
        assert_eq!(cfg.read_timeout_ms, 1000);
        assert_eq!(cfg.endpoints, EndpointDirectory::default());
    }

    #[test]
    fn test_from_json_str_invalid_is_parse_error() {
        let err = ClientConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = ClientConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validated_clamps_zero_values() {
        let cfg = ClientConfig {
            read_timeout_ms: 0,
            connect_timeout_ms: 0,
            error_threshold: 0,
            keepalive_interval_secs: 0,
            ..ClientConfig::default()
        }
        .validated()
        .unwrap();
        assert_eq!(cfg.read_timeout_ms, 1000);
        assert_eq!(cfg.connect_timeout_ms, 3000);
        assert_eq!(cfg.error_threshold, 30);
        assert_eq!(cfg.keepalive_interval_secs, 20);
    }

    #[test]
    fn test_validated_shortens_keepalive_past_read_budget() {
        let cfg = ClientConfig {
            read_timeout_ms: 500,
            error_threshold: 30,
            keepalive_initial_secs: 60,
            keepalive_interval_secs: 10,
            ..ClientConfig::default()
        }
        .validated()
        .unwrap();
        assert_eq!(cfg.silence_budget(), Duration::from_secs(15));
        assert_eq!(cfg.keepalive_initial_secs, 10);
        assert_eq!(cfg.keepalive_interval_secs, 10);
    }

    #[test]
    fn test_validated_keeps_defaults_inside_read_budget() {
        let cfg = ClientConfig::default().validated().unwrap();
        assert_eq!(cfg.keepalive_initial_secs, 20);
        assert_eq!(cfg.keepalive_interval_secs, 20);
    }

    #[test]
    fn test_validated_rejects_empty_player_name() {
        let cfg = ClientConfig {
            player_name: "  ".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(cfg.validated(), Err(ConfigError::EmptyPlayerName)));
    }

    #[test]
    fn test_validated_rejects_empty_directory() {
        let cfg = ClientConfig {
            endpoints: EndpointDirectory::new(Vec::new()),
            ..ClientConfig::default()
        };
        assert!(matches!(cfg.validated(), Err(ConfigError::NoEndpoints)));
    }

    #[test]
    fn test_validated_rejects_endpoint_without_ports() {
        let cfg = ClientConfig {
            endpoints: EndpointDirectory::new(vec![Endpoint::new("h", "H", &[])]),
            ..ClientConfig::default()
        };
        assert!(matches!(cfg.validated(), Err(ConfigError::NoPorts { host }) if host == "h"));
    }
}
