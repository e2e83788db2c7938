use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default upstream base URL
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Upstream chat-completion API configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bearer credential; requests fail with a configuration error without it
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Bound on a primary completion call
    #[serde(default = "default_request_timeout", deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
    /// Bound on a model validation probe
    #[serde(default = "default_probe_timeout", deserialize_with = "crate::duration::deserialize")]
    pub probe_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout: default_request_timeout(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_BASE_URL).expect("valid default URL")
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

const fn default_probe_timeout() -> Duration {
    Duration::from_secs(5)
}
