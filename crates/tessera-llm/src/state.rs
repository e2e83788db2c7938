//! Per-request proxy pipeline and the state shared by route handlers

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tessera_config::{Config, ReasoningConfig};

use crate::capabilities::ModelCapabilities;
use crate::error::LlmError;
use crate::normalize::normalize_messages;
use crate::protocol::{ChatCompletion, ChatRequest, ModelEntry, ModelList, UpstreamRequest};
use crate::request::{SamplingParams, build_upstream_request};
use crate::resolver::{ModelResolver, ValidatedModelCache, ValidatedModels};
use crate::transcode::{ReasoningDisplay, transcode_completion, transcode_stream};
use crate::upstream::UpstreamClient;

/// Shared state for proxy route handlers
#[derive(Clone)]
pub struct LlmState {
    inner: Arc<LlmStateInner>,
}

struct LlmStateInner {
    upstream: Arc<UpstreamClient>,
    resolver: ModelResolver,
    capabilities: ModelCapabilities,
    reasoning: ReasoningConfig,
    keepalive_interval: Duration,
}

impl LlmState {
    /// Build state with a fresh in-memory validated-model cache
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::with_validated_models(config, Arc::new(ValidatedModelCache::new()))
    }

    /// Build state around an existing validated-model set
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be constructed.
    pub fn with_validated_models(config: &Config, validated: Arc<dyn ValidatedModels>) -> Result<Self, LlmError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
        let resolver = ModelResolver::new(&config.models, validated, upstream.clone());

        if !upstream.has_credential() {
            tracing::warn!("no upstream API key configured; completion requests will fail");
        }

        Ok(Self {
            inner: Arc::new(LlmStateInner {
                upstream,
                resolver,
                capabilities: ModelCapabilities::from_config(&config.models),
                reasoning: config.reasoning,
                keepalive_interval: config.streaming.keepalive_interval,
            }),
        })
    }

    pub fn reasoning(&self) -> ReasoningConfig {
        self.inner.reasoning
    }

    pub fn keepalive_interval(&self) -> Duration {
        self.inner.keepalive_interval
    }

    fn display(&self) -> ReasoningDisplay {
        ReasoningDisplay::from_config(&self.inner.reasoning)
    }

    /// Validate, resolve, normalize and build; returns the caller's model
    /// name alongside the upstream request
    async fn prepare(&self, request: ChatRequest) -> Result<(String, UpstreamRequest), LlmError> {
        if !self.inner.upstream.has_credential() {
            return Err(LlmError::missing_credential());
        }

        let ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
            stream,
        } = request;

        if messages.is_empty() {
            return Err(LlmError::InvalidRequest("messages must be a non-empty array".to_owned()));
        }

        let resolution = self.inner.resolver.resolve(&model).await;
        tracing::info!(
            requested = %model,
            upstream = %resolution.model,
            source = ?resolution.source,
            "resolved model"
        );

        let messages = normalize_messages(&resolution.model, messages, &self.inner.capabilities);
        let upstream_request = build_upstream_request(
            resolution.model,
            messages,
            SamplingParams {
                temperature,
                max_tokens,
                stream,
            },
            self.inner.reasoning.thinking_mode,
            &self.inner.capabilities,
        );

        Ok((model, upstream_request))
    }

    /// Run a non-streaming completion
    ///
    /// # Errors
    ///
    /// Returns an error for a missing credential, an empty message list, or
    /// any upstream failure.
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, LlmError> {
        let (caller_model, mut upstream_request) = self.prepare(request).await?;
        upstream_request.stream = false;

        let completion = self.inner.upstream.complete(&upstream_request).await?;

        Ok(transcode_completion(completion, caller_model, self.display()))
    }

    /// Start a streaming completion and return the outbound frame payloads
    ///
    /// # Errors
    ///
    /// Returns an error for a missing credential, an empty message list, or
    /// an upstream failure before the first byte of the stream.
    pub async fn complete_stream(&self, request: ChatRequest) -> Result<BoxStream<'static, String>, LlmError> {
        let (_, mut upstream_request) = self.prepare(request).await?;
        upstream_request.stream = true;

        let upstream = self.inner.upstream.complete_stream(&upstream_request).await?;

        Ok(transcode_stream(upstream, self.display()).boxed())
    }

    /// Caller-facing model catalog, built from the alias table
    pub fn list_models(&self) -> ModelList {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        ModelList {
            object: "list".to_owned(),
            data: self
                .inner
                .resolver
                .aliases()
                .map(|alias| ModelEntry {
                    id: alias.to_owned(),
                    object: "model".to_owned(),
                    created,
                    owned_by: "tessera".to_owned(),
                })
                .collect(),
        }
    }
}
