//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use tessera_config::Config;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults plus a loopback listener and a dummy upstream credential
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        config.upstream.api_key = Some(SecretString::from("test-key"));

        Self { config }
    }

    /// Point the upstream at a mock backend
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream.base_url = base_url.parse().expect("valid URL");
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.config.upstream.api_key = None;
        self
    }

    pub fn show_reasoning(mut self, display: bool) -> Self {
        self.config.reasoning.display = display;
        self
    }

    pub fn thinking_mode(mut self, enabled: bool) -> Self {
        self.config.reasoning.thinking_mode = enabled;
        self
    }

    pub fn with_alias(mut self, alias: &str, model: &str) -> Self {
        self.config.models.aliases.insert(alias.to_owned(), model.to_owned());
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.upstream.probe_timeout = timeout;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
