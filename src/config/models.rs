//! Configuration data structures for Pulsegate.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. They are
//! intentionally serde‑friendly and include defaults so that minimal configs remain concise.
//! A config with nothing but `endpoint` set is fully usable.
use serde::{Deserialize, Serialize};

/// Default logical receiver name used for tagging metrics and spans
fn default_receiver_name() -> String {
    "datapoint".to_string()
}

/// Default uniform read/write deadline applied to every connection
fn default_server_timeout_secs() -> u64 {
    20
}

/// Default cap on the decoded (post-decompression) request payload
fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

/// Configuration for a single datapoint receiver.
///
/// Immutable after construction; the receiver only ever reads it through an
/// `Arc`. The `endpoint` must be non-empty — receiver construction fails
/// before any network resource is acquired otherwise.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReceiverConfig {
    /// Address to bind the HTTP listener to (e.g. "0.0.0.0:9943")
    pub endpoint: String,
    /// Logical receiver name, used as a label on metrics and span fields
    #[serde(default = "default_receiver_name")]
    pub name: String,
    /// Read/write deadline in seconds, applied uniformly to all connections
    #[serde(default = "default_server_timeout_secs")]
    pub server_timeout_secs: u64,
    /// Maximum accepted payload size in bytes, after decompression
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            endpoint: "0.0.0.0:9943".to_string(),
            name: default_receiver_name(),
            server_timeout_secs: default_server_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReceiverConfig::default();
        assert_eq!(config.endpoint, "0.0.0.0:9943");
        assert_eq!(config.name, "datapoint");
        assert_eq!(config.server_timeout_secs, 20);
        assert_eq!(config.max_body_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: ReceiverConfig =
            serde_json::from_str(r#"{"endpoint": "127.0.0.1:1234"}"#).unwrap();
        assert_eq!(config.endpoint, "127.0.0.1:1234");
        assert_eq!(config.name, "datapoint");
        assert_eq!(config.server_timeout_secs, 20);
    }
}
