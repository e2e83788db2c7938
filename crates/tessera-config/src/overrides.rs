use std::net::SocketAddr;

use secrecy::SecretString;
use url::Url;

use crate::Config;

/// Values supplied on the command line or through the environment
///
/// Each `Some` replaces the corresponding file value.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub listen_address: Option<SocketAddr>,
    /// Replaces only the port of the listen address
    pub port: Option<u16>,
    pub upstream_base_url: Option<Url>,
    pub upstream_api_key: Option<SecretString>,
    pub show_reasoning: Option<bool>,
    pub thinking_mode: Option<bool>,
}

impl Config {
    /// Apply command-line / environment overrides on top of file values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(address) = overrides.listen_address {
            self.server.listen_address = Some(address);
        }

        if let Some(port) = overrides.port {
            let mut address = self.server.listen_address();
            address.set_port(port);
            self.server.listen_address = Some(address);
        }

        if let Some(base_url) = overrides.upstream_base_url {
            self.upstream.base_url = base_url;
        }

        if let Some(api_key) = overrides.upstream_api_key {
            self.upstream.api_key = Some(api_key);
        }

        if let Some(display) = overrides.show_reasoning {
            self.reasoning.display = display;
        }

        if let Some(thinking_mode) = overrides.thinking_mode {
            self.reasoning.thinking_mode = thinking_mode;
        }
    }
}
