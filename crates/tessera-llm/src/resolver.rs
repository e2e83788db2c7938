//! Caller model name → upstream model resolution
//!
//! Resolution is a cascade that never fails: static alias, previously
//! validated name, live probe, then a size-tier guess.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use http::StatusCode;
use indexmap::IndexMap;
use tessera_config::{FallbackModels, ModelsConfig};

/// Set of upstream model ids confirmed to exist
///
/// Shared by all in-flight requests, so implementations must tolerate
/// concurrent lookups and inserts.
pub trait ValidatedModels: Send + Sync {
    fn contains(&self, model: &str) -> bool;

    fn insert(&self, model: &str);
}

/// In-memory validated-model set; grows for the life of the process
#[derive(Debug, Default)]
pub struct ValidatedModelCache {
    models: DashSet<String>,
}

impl ValidatedModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ValidatedModels for ValidatedModelCache {
    fn contains(&self, model: &str) -> bool {
        self.models.contains(model)
    }

    fn insert(&self, model: &str) {
        self.models.insert(model.to_owned());
    }
}

/// Result of asking upstream whether a model exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Upstream answered 2xx
    Confirmed,
    /// Upstream answered with a non-2xx status below 500
    Rejected(StatusCode),
    /// No usable answer: server error, network failure or timeout
    Unconfirmed(String),
}

/// Live check of a model id against upstream
#[async_trait]
pub trait ModelProbe: Send + Sync {
    async fn probe(&self, model: &str) -> ProbeOutcome;
}

/// Size tier for heuristic fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Large,
    Medium,
    Small,
}

impl SizeTier {
    /// Guess a tier from substrings of the requested model name
    pub fn classify(model: &str) -> Self {
        let lower = model.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|needle| lower.contains(needle));

        if mentions(&["gpt-4", "claude-opus", "405b"]) {
            Self::Large
        } else if mentions(&["claude", "gemini", "70b"]) {
            Self::Medium
        } else {
            Self::Small
        }
    }
}

/// Which cascade step produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Alias,
    Cached,
    Probed,
    Fallback(SizeTier),
}

/// Upstream model chosen for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub model: String,
    pub source: ResolutionSource,
}

/// Resolves caller model names to upstream model ids
pub struct ModelResolver {
    aliases: IndexMap<String, String>,
    fallback: FallbackModels,
    validated: Arc<dyn ValidatedModels>,
    probe: Arc<dyn ModelProbe>,
}

impl ModelResolver {
    pub fn new(config: &ModelsConfig, validated: Arc<dyn ValidatedModels>, probe: Arc<dyn ModelProbe>) -> Self {
        Self {
            aliases: config.aliases.clone(),
            fallback: config.fallback.clone(),
            validated,
            probe,
        }
    }

    /// Caller-facing names from the alias table, in configured order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// Resolve `requested` to an upstream model id
    pub async fn resolve(&self, requested: &str) -> Resolution {
        if let Some(model) = self.aliases.get(requested) {
            return Resolution {
                model: model.clone(),
                source: ResolutionSource::Alias,
            };
        }

        if self.validated.contains(requested) {
            return Resolution {
                model: requested.to_owned(),
                source: ResolutionSource::Cached,
            };
        }

        if !requested.is_empty() {
            match self.probe.probe(requested).await {
                ProbeOutcome::Confirmed => {
                    tracing::info!(model = %requested, "upstream confirmed model");
                    self.validated.insert(requested);
                    return Resolution {
                        model: requested.to_owned(),
                        source: ResolutionSource::Probed,
                    };
                }
                ProbeOutcome::Rejected(status) => {
                    tracing::debug!(model = %requested, %status, "upstream rejected model");
                }
                ProbeOutcome::Unconfirmed(reason) => {
                    tracing::warn!(model = %requested, %reason, "model probe inconclusive");
                }
            }
        }

        let tier = SizeTier::classify(requested);
        let model = match tier {
            SizeTier::Large => &self.fallback.large,
            SizeTier::Medium => &self.fallback.medium,
            SizeTier::Small => &self.fallback.small,
        };

        tracing::debug!(requested = %requested, fallback = %model, ?tier, "using fallback model");

        Resolution {
            model: model.clone(),
            source: ResolutionSource::Fallback(tier),
        }
    }
}
