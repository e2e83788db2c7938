//! Chat-completion wire types for both sides of the proxy
//!
//! The caller and upstream dialects share the message shape; they differ in
//! model catalog, the thinking extension, and the upstream's separate
//! `reasoning_content` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -- Messages --

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Content,
}

impl ChatMessage {
    /// Plain-text message
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: Content::Text(text.into()),
        }
    }
}

/// Message content, either a single text blob or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One typed part of structured content
///
/// Only `text` parts carry meaning for the proxy; other part types (images
/// and the like) are kept verbatim in `extra` so they survive pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentPart {
    /// Build a `text` part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_owned(),
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    /// Text of this part if it is a `text` part
    pub fn as_text(&self) -> Option<&str> {
        if self.kind == "text" { self.text.as_deref() } else { None }
    }
}

// -- Caller request --

/// Inbound `POST /v1/chat/completions` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: Option<bool>,
}

impl ChatRequest {
    /// Whether the caller asked for a streamed response
    pub fn is_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

// -- Upstream request --

/// Body sent to the upstream `/chat/completions` endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
    /// Thinking extension; omitted entirely for models that do not support it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_template_kwargs: Option<ThinkingOptions>,
}

/// Thinking-mode request extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThinkingOptions {
    pub thinking: bool,
}

// -- Upstream response --

/// Non-streaming upstream response; only the fields the proxy reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCompletion {
    #[serde(default)]
    pub choices: Vec<UpstreamChoice>,
    /// Kept as raw JSON so extra counters pass through untouched
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: UpstreamMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

// -- Caller response --

/// Outbound non-streaming response
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletion {
    pub id: String,
    pub object: &'static str,
    pub created: u64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessage {
    pub role: Role,
    pub content: String,
}

/// Token counters used when upstream reports none
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

// -- Models list --

/// `GET /v1/models` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_accepts_both_shapes() {
        let text: ChatMessage = serde_json::from_value(serde_json::json!({"role": "user", "content": "hi"})).unwrap();
        assert_eq!(text.content, Content::Text("hi".to_owned()));

        let parts: ChatMessage = serde_json::from_value(serde_json::json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "look"},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}}
            ]
        }))
        .unwrap();

        let Content::Parts(parts) = parts.content else {
            panic!("expected structured content");
        };
        assert_eq!(parts[0].as_text(), Some("look"));
        assert_eq!(parts[1].as_text(), None);
        assert_eq!(parts[1].extra["image_url"]["url"], "https://example.com/a.png");
    }

    #[test]
    fn non_text_parts_round_trip_verbatim() {
        let raw = serde_json::json!({"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}});
        let part: ContentPart = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&part).unwrap(), raw);
    }

    #[test]
    fn thinking_extension_is_omitted_when_absent() {
        let request = UpstreamRequest {
            model: "meta/llama-3.1-8b-instruct".to_owned(),
            messages: vec![ChatMessage::text(Role::User, "hi")],
            temperature: 0.6,
            max_tokens: 9024,
            stream: false,
            chat_template_kwargs: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("chat_template_kwargs").is_none());
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_value::<ChatMessage>(serde_json::json!({"role": "wizard", "content": "x"}));
        assert!(result.is_err());
    }
}
