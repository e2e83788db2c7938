//! Configuration for the Tessera proxy
//!
//! Loaded from an optional TOML file (with `{{ env.VAR }}` expansion) and
//! then patched with command-line / environment overrides.

#![allow(clippy::must_use_candidate)]

pub mod cors;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod models;
mod overrides;
pub mod reasoning;
pub mod server;
pub mod streaming;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use models::*;
pub use overrides::ConfigOverrides;
pub use reasoning::*;
pub use server::*;
pub use streaming::*;
pub use telemetry::*;
pub use upstream::*;

/// Top-level Tessera configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener, health and CORS settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream chat-completion API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Model catalog: aliases, capability sets and fallback tiers
    #[serde(default)]
    pub models: ModelsConfig,
    /// Reasoning display and thinking-mode policy
    #[serde(default)]
    pub reasoning: ReasoningConfig,
    /// Streaming response settings
    #[serde(default)]
    pub streaming: StreamingConfig,
    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
