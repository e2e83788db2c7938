use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::parse(&raw)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");

        Ok(config)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// A missing upstream credential is deliberately not checked here: it
    /// surfaces per request as a configuration error instead.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_models()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_models(&self) -> anyhow::Result<()> {
        for (alias, target) in &self.models.aliases {
            if alias.trim().is_empty() {
                anyhow::bail!("models.aliases contains an empty model name");
            }
            if target.trim().is_empty() {
                anyhow::bail!("models.aliases entry '{alias}' maps to an empty upstream model");
            }
        }

        let fallback = &self.models.fallback;
        for (tier, model) in [("large", &fallback.large), ("medium", &fallback.medium), ("small", &fallback.small)] {
            if model.trim().is_empty() {
                anyhow::bail!("models.fallback.{tier} must not be empty");
            }
        }

        Ok(())
    }

    fn validate_timeouts(&self) -> anyhow::Result<()> {
        let timeouts = [
            ("server.request_timeout", self.server.request_timeout),
            ("upstream.request_timeout", self.upstream.request_timeout),
            ("upstream.probe_timeout", self.upstream.probe_timeout),
            ("streaming.keepalive_interval", self.streaming.keepalive_interval),
        ];

        for (name, value) in timeouts {
            if value.is_zero() {
                anyhow::bail!("{name} must be greater than zero");
            }
        }

        Ok(())
    }
}
