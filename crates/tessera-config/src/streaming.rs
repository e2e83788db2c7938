use std::time::Duration;

use serde::Deserialize;

/// Streaming response configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamingConfig {
    /// Idle interval after which an SSE comment is sent to keep intermediaries from timing out
    #[serde(default = "default_keepalive_interval", deserialize_with = "crate::duration::deserialize")]
    pub keepalive_interval: Duration,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: default_keepalive_interval(),
        }
    }
}

const fn default_keepalive_interval() -> Duration {
    Duration::from_secs(15)
}
