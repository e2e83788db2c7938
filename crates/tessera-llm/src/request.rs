//! Upstream request assembly

use crate::capabilities::ModelCapabilities;
use crate::protocol::{ChatMessage, ThinkingOptions, UpstreamRequest};

/// Sampling temperature used when the caller sends none
pub const DEFAULT_TEMPERATURE: f64 = 0.6;

/// Output token cap used when the caller sends none
pub const DEFAULT_MAX_TOKENS: u32 = 9024;

/// Caller-supplied sampling parameters, all optional
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingParams {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub stream: Option<bool>,
}

/// Build the upstream request body
///
/// Defaults apply only to absent fields, so an explicit `temperature: 0`
/// is sent as `0`. The thinking extension is attached only when thinking
/// mode is on for the deployment and the model declares support for it.
pub fn build_upstream_request(
    model: String,
    messages: Vec<ChatMessage>,
    params: SamplingParams,
    thinking_mode: bool,
    capabilities: &ModelCapabilities,
) -> UpstreamRequest {
    let chat_template_kwargs =
        (thinking_mode && capabilities.supports_thinking(&model)).then_some(ThinkingOptions { thinking: true });

    UpstreamRequest {
        temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        stream: params.stream.unwrap_or(false),
        chat_template_kwargs,
        model,
        messages,
    }
}
