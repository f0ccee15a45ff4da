use serde::Deserialize;

/// Top-level configuration settings for the relay.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub relay: RelaySettings,
    pub log: LogSettings,
}

/// Where the HTTP server binds and which path prefix its routes live under.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub route_prefix: String,
}

/// Location and flush policy of the sled database holding the message log.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
    pub flush_every_ms: u64,
}

/// Fan-out parameters.
///
/// `channel` is the broadcast channel every message is published on,
/// `default_topic` replaces an empty topic on submission.
#[derive(Debug, Deserialize, Clone)]
pub struct RelaySettings {
    pub channel: String,
    pub default_topic: String,
    pub broadcast_capacity: usize,
    pub max_viewers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub relay: Option<PartialRelaySettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub route_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
    pub flush_every_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRelaySettings {
    pub channel: Option<String>,
    pub default_topic: Option<String>,
    pub broadcast_capacity: Option<usize>,
    pub max_viewers: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                route_prefix: "/chatapp".to_string(),
            },
            storage: StorageSettings {
                path: "chatrelay_db".to_string(),
                flush_every_ms: 500,
            },
            relay: RelaySettings {
                channel: "messages".to_string(),
                default_topic: "chat".to_string(),
                broadcast_capacity: 1024,
                max_viewers: 1000,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Overlay whatever the partial settings provide on top of the defaults.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Self::default();
        let server = partial.server;
        let storage = partial.storage;
        let relay = partial.relay;
        let log = partial.log;

        Self {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
                route_prefix: server
                    .as_ref()
                    .and_then(|s| s.route_prefix.clone())
                    .unwrap_or(default.server.route_prefix),
            },
            storage: StorageSettings {
                path: storage
                    .as_ref()
                    .and_then(|s| s.path.clone())
                    .unwrap_or(default.storage.path),
                flush_every_ms: storage
                    .as_ref()
                    .and_then(|s| s.flush_every_ms)
                    .unwrap_or(default.storage.flush_every_ms),
            },
            relay: RelaySettings {
                channel: relay
                    .as_ref()
                    .and_then(|r| r.channel.clone())
                    .unwrap_or(default.relay.channel),
                default_topic: relay
                    .as_ref()
                    .and_then(|r| r.default_topic.clone())
                    .unwrap_or(default.relay.default_topic),
                broadcast_capacity: relay
                    .as_ref()
                    .and_then(|r| r.broadcast_capacity)
                    .unwrap_or(default.relay.broadcast_capacity),
                max_viewers: relay
                    .as_ref()
                    .and_then(|r| r.max_viewers)
                    .unwrap_or(default.relay.max_viewers),
            },
            log: LogSettings {
                level: log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
        }
    }
}
