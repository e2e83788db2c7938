//! HTTP transport to the upstream chat-completion endpoint

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use reqwest::{Client, RequestBuilder, Response, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tessera_config::UpstreamConfig;

use crate::error::LlmError;
use crate::protocol::{UpstreamCompletion, UpstreamRequest};
use crate::resolver::{ModelProbe, ProbeOutcome};

/// Client for `{base}/chat/completions`
pub struct UpstreamClient {
    client: Client,
    completions_url: String,
    api_key: Option<SecretString>,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(concat!("tessera/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(anyhow::Error::from)?;

        let base = config.base_url.as_str().trim_end_matches('/');

        Ok(Self {
            client,
            completions_url: format!("{base}/chat/completions"),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout,
            probe_timeout: config.probe_timeout,
        })
    }

    /// Whether a non-empty bearer credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    fn post(&self, body: &impl Serialize) -> RequestBuilder {
        let builder = self.client.post(&self.completions_url).json(body);

        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }

    /// Non-streaming completion; the whole exchange is bounded by the
    /// request timeout
    pub async fn complete(&self, request: &UpstreamRequest) -> Result<UpstreamCompletion, LlmError> {
        let response = self
            .post(request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| transport_error(&request.model, &e))?;

        if !response.status().is_success() {
            return Err(error_from_response(&request.model, response).await);
        }

        response.json().await.map_err(|e| {
            tracing::warn!(model = %request.model, error = %e, "failed to parse upstream response");
            LlmError::Upstream {
                status: None,
                message: format!("failed to parse upstream response: {e}"),
            }
        })
    }

    /// Streaming completion
    ///
    /// Only the wait for response headers is bounded by the request
    /// timeout; the body stream runs for as long as upstream keeps it open.
    pub async fn complete_stream(
        &self,
        request: &UpstreamRequest,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static, LlmError> {
        let send = self
            .post(request)
            .header(header::ACCEPT, "text/event-stream")
            .send();

        let response = tokio::time::timeout(self.request_timeout, send)
            .await
            .map_err(|_| {
                tracing::warn!(model = %request.model, timeout = ?self.request_timeout, "upstream stream did not start in time");
                LlmError::Upstream {
                    status: None,
                    message: format!("upstream did not respond within {}s", self.request_timeout.as_secs()),
                }
            })?
            .map_err(|e| transport_error(&request.model, &e))?;

        if !response.status().is_success() {
            return Err(error_from_response(&request.model, response).await);
        }

        Ok(response.bytes_stream())
    }
}

#[async_trait]
impl ModelProbe for UpstreamClient {
    async fn probe(&self, model: &str) -> ProbeOutcome {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": "test"}],
            "max_tokens": 1,
        });

        match self.post(&body).timeout(self.probe_timeout).send().await {
            Ok(response) if response.status().is_success() => ProbeOutcome::Confirmed,
            Ok(response) if response.status().is_server_error() => {
                ProbeOutcome::Unconfirmed(format!("upstream returned {}", response.status()))
            }
            Ok(response) => ProbeOutcome::Rejected(response.status()),
            Err(e) => ProbeOutcome::Unconfirmed(e.to_string()),
        }
    }
}

fn transport_error(model: &str, error: &reqwest::Error) -> LlmError {
    tracing::error!(model = %model, error = %error, "upstream request failed");

    LlmError::Upstream {
        status: error.status(),
        message: error.to_string(),
    }
}

async fn error_from_response(model: &str, response: Response) -> LlmError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    tracing::warn!(model = %model, status = %status, "upstream returned error");

    LlmError::Upstream {
        status: Some(status),
        message: extract_error_message(&body).unwrap_or_else(|| format!("upstream returned {status}")),
    }
}

/// Most specific message in an upstream error body
///
/// Tries `error.message`, then `error` as a plain string, then top-level
/// `detail` and `message`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error");

    [
        error.and_then(|e| e.get("message")),
        error,
        value.get("detail"),
        value.get("message"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .find(|message| !message.trim().is_empty())
    .map(str::to_owned)
}
