//! Logging setup for Tessera
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! formatting layer chosen by configuration.

use tessera_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. An invalid
/// configured filter degrades to `info` rather than aborting startup.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &config.log_filter);

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
    }

    Ok(())
}

/// Pick the filter directive: environment first, then config, then `info`
fn build_filter(env_directive: Option<&str>, configured: &str) -> EnvFilter {
    env_directive
        .filter(|directive| !directive.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn environment_directive_wins() {
        let filter = build_filter(Some("tessera_llm=trace"), "warn");
        assert_eq!(filter.to_string(), "tessera_llm=trace");
    }

    #[test]
    fn blank_environment_falls_back_to_config() {
        let filter = build_filter(Some("  "), "tessera=debug");
        assert_eq!(filter.to_string(), "tessera=debug");
    }

    #[test]
    fn configured_directive_used_without_environment() {
        let filter = build_filter(None, "warn");
        assert_eq!(filter.to_string(), "warn");
    }
}
