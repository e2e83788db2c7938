use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use clap::builder::BoolishValueParser;
use secrecy::SecretString;
use tessera_config::ConfigOverrides;
use url::Url;

/// Tessera chat-completion proxy
#[derive(Debug, Parser)]
#[command(
    name = "tessera",
    about = "Translate OpenAI-style chat completions to an OpenAI-compatible inference catalog"
)]
pub struct Args {
    /// Path to configuration file; built-in defaults apply when omitted
    #[arg(short, long, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "TESSERA_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Upstream API base URL
    #[arg(long, env = "UPSTREAM_BASE_URL")]
    pub upstream_base_url: Option<Url>,

    /// Upstream bearer credential
    #[arg(long, env = "UPSTREAM_API_KEY", hide_env_values = true)]
    pub upstream_api_key: Option<String>,

    /// Merge reasoning into answers inside `<think>` markers
    #[arg(long, env = "SHOW_REASONING", value_parser = BoolishValueParser::new())]
    pub show_reasoning: Option<bool>,

    /// Request reasoning from thinking-capable models
    #[arg(long, env = "ENABLE_THINKING_MODE", value_parser = BoolishValueParser::new())]
    pub thinking_mode: Option<bool>,
}

impl Args {
    /// Overrides to layer on top of the file configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_address: self.listen,
            port: self.port,
            upstream_base_url: self.upstream_base_url.clone(),
            upstream_api_key: self.upstream_api_key.clone().map(SecretString::from),
            show_reasoning: self.show_reasoning,
            thinking_mode: self.thinking_mode,
        }
    }
}
