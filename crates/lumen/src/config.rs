//! Client configuration.

use std::path::Path;

use lumen_update::{FrameConfig, UpdateConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::LumenError;
use crate::dispatch::RetryPolicy;

/// How to reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// `server` is a `host:port` address.
    #[default]
    Tcp,
    /// `server` is a `ws://` or `wss://` URL.
    WebSocket,
}

/// Everything the client runtime needs to start.
///
/// Every field has a default, so a config file only has to name what it
/// changes:
///
/// ```json
/// { "server": "game.example.net:3012", "frame": { "rate_hz": 30 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    pub transport: TransportKind,
    /// Decoded replies buffered between the reader task and the update
    /// loop. The reader waits when this fills up.
    pub inbound_capacity: usize,
    pub frame: FrameConfig,
    pub retry: RetryPolicy,
    pub update: UpdateConfig,
    /// Default tracing filter when `RUST_LOG` isn't set.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1:3012".to_string(),
            transport: TransportKind::default(),
            inbound_capacity: 1024,
            frame: FrameConfig::default(),
            retry: RetryPolicy::default(),
            update: UpdateConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LumenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LumenError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LumenError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Clamps values the runtime can't work with, logging each one.
    pub fn validated(mut self) -> Self {
        if self.inbound_capacity == 0 {
            warn!("inbound_capacity must be at least 1, clamping");
            self.inbound_capacity = 1;
        }
        if self.retry.max_attempts == 0 {
            warn!("retry.max_attempts must be at least 1, clamping");
            self.retry.max_attempts = 1;
        }
        self.frame = self.frame.validated();
        self
    }
}

/// Serializes a `Duration` as whole milliseconds.
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_json_is_default() {
        let cfg = ClientConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let cfg = ClientConfig::from_json_str(
            r#"{
                "server": "ws://localhost:9000",
                "transport": "websocket",
                "frame": { "rate_hz": 30 },
                "retry": { "max_age": 250 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.transport, TransportKind::WebSocket);
        assert_eq!(cfg.frame.rate_hz, 30);
        assert_eq!(cfg.retry.max_age, Duration::from_millis(250));
        assert_eq!(cfg.retry.max_attempts, 600);
        assert_eq!(cfg.inbound_capacity, 1024);
    }

    #[test]
    fn test_bad_json_is_a_config_error() {
        let err = ClientConfig::from_json_str("{ server: }").unwrap_err();
        assert!(matches!(err, LumenError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = ClientConfig::load("/nonexistent/lumen.json").unwrap_err();
        assert!(matches!(err, LumenError::ConfigRead { .. }));
    }

    #[test]
    fn test_validated_clamps_zeroes() {
        let cfg = ClientConfig {
            inbound_capacity: 0,
            retry: RetryPolicy {
                max_attempts: 0,
                ..RetryPolicy::default()
            },
            frame: FrameConfig::with_rate(10_000),
            ..ClientConfig::default()
        }
        .validated();
        assert_eq!(cfg.inbound_capacity, 1);
        assert_eq!(cfg.retry.max_attempts, 1);
        assert_eq!(cfg.frame.rate_hz, FrameConfig::MAX_RATE_HZ);
    }
}
