//! Endpoint directory: the servers the client may connect to.

use serde::{Deserialize, Serialize};

/// One chat server and the ports it listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or address to connect to.
    pub host: String,
    /// Display name reported to the event sink before each attempt.
    pub name: String,
    /// Ports to try, in order.
    pub ports: Vec<u16>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, name: impl Into<String>, ports: &[u16]) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            ports: ports.to_vec(),
        }
    }
}

/// Ordered list of endpoints. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointDirectory {
    endpoints: Vec<Endpoint>,
}

impl EndpointDirectory {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// Every `(endpoint, port)` pair in the order they should be tried.
    pub fn candidates(&self) -> impl Iterator<Item = (&Endpoint, u16)> + '_ {
        self.endpoints
            .iter()
            .flat_map(|ep| ep.ports.iter().map(move |port| (ep, *port)))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }
}

impl Default for EndpointDirectory {
    /// The public GameSurge servers, round-robin alias first.
    fn default() -> Self {
        Self::new(vec![
            Endpoint::new("irc.gamesurge.net", "GameSurge", &[6667]),
            Endpoint::new(
                "Burstfire.UK.EU.GameSurge.net",
                "London, UK",
                &[6667, 6668, 7000],
            ),
            Endpoint::new(
                "ColoCrossing.IL.US.GameSurge.net",
                "Chicago, IL",
                &[6660, 6666, 6667, 6668, 6669],
            ),
            Endpoint::new(
                "Gameservers.NJ.US.GameSurge.net",
                "Newark, NJ",
                &[6665, 6666, 6667, 6668, 6669, 7000, 8080],
            ),
            Endpoint::new(
                "Krypt.CA.US.GameSurge.net",
                "Santa Ana, CA",
                &[6666, 6667, 6668, 6669],
            ),
            Endpoint::new(
                "NuclearFallout.WA.US.GameSurge.net",
                "Seattle, WA",
                &[6667, 5960],
            ),
            Endpoint::new(
                "Portlane.SE.EU.GameSurge.net",
                "Stockholm, Sweden",
                &[6660, 6666, 6667, 6668, 6669],
            ),
            Endpoint::new(
                "Prothid.NY.US.GameSurge.Net",
                "NYC, NY",
                &[5960, 6660, 6666, 6667, 6668, 6669, 6697],
            ),
            Endpoint::new(
                "TAL.DE.EU.GameSurge.net",
                "Wuppertal, Germany",
                &[6660, 6666, 6667, 6668, 6669],
            ),
        ])
    }
}
