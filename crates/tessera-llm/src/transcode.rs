//! Upstream → caller response transcoding
//!
//! Upstream delivers reasoning in a separate `reasoning_content` field. The
//! caller dialect has a single `content` field, so reasoning is either
//! dropped or merged into the answer between `<think>` markers.
//!
//! Streaming responses are re-framed line by line. The transcoder keeps a
//! byte carry buffer because network reads split SSE lines (and UTF-8
//! sequences) at arbitrary points, and tracks whether a `<think>` span is
//! currently open.

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use futures_util::{Stream, StreamExt, future, stream};
use serde_json::{Map, Value};
use tessera_config::ReasoningConfig;

use crate::protocol::{AssistantMessage, ChatCompletion, CompletionChoice, Role, UpstreamCompletion, Usage};

const DATA_PREFIX: &[u8] = b"data: ";
const DONE_SENTINEL: &str = "[DONE]";
const THINK_OPEN: &str = "<think>\n";
const THINK_CLOSE: &str = "</think>\n\n";

/// Whether reasoning is surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReasoningDisplay {
    Show,
    #[default]
    Hide,
}

impl ReasoningDisplay {
    pub const fn from_config(config: &ReasoningConfig) -> Self {
        if config.display { Self::Show } else { Self::Hide }
    }

    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Show)
    }
}

// -- Non-streaming --

/// Rewrite a complete upstream response into the caller dialect
///
/// The caller's requested model name is echoed back rather than the
/// upstream model it resolved to.
pub fn transcode_completion(upstream: UpstreamCompletion, caller_model: String, display: ReasoningDisplay) -> ChatCompletion {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();

    let choices = upstream
        .choices
        .into_iter()
        .map(|choice| {
            let answer = choice.message.content.unwrap_or_default();
            let content = match choice.message.reasoning_content {
                Some(reasoning) if display.is_shown() && !reasoning.is_empty() => {
                    format!("{THINK_OPEN}{reasoning}\n{THINK_CLOSE}{answer}")
                }
                _ => answer,
            };

            CompletionChoice {
                index: choice.index,
                message: AssistantMessage {
                    role: Role::Assistant,
                    content,
                },
                finish_reason: choice.finish_reason,
            }
        })
        .collect();

    ChatCompletion {
        id: format!("chatcmpl-{}", now.as_millis()),
        object: "chat.completion",
        created: now.as_secs(),
        model: caller_model,
        choices,
        usage: upstream
            .usage
            .unwrap_or_else(|| serde_json::to_value(Usage::default()).unwrap_or_default()),
    }
}

// -- Streaming --

/// Per-response SSE re-framing state machine
///
/// Feed raw upstream bytes to [`push`](Self::push); each returned string is
/// the payload of one outbound `data:` frame.
#[derive(Debug)]
pub struct StreamTranscoder {
    display: ReasoningDisplay,
    reasoning_open: bool,
    carry: Vec<u8>,
}

impl StreamTranscoder {
    pub const fn new(display: ReasoningDisplay) -> Self {
        Self {
            display,
            reasoning_open: false,
            carry: Vec::new(),
        }
    }

    /// Whether a `<think>` span has been opened and not yet closed
    pub const fn reasoning_open(&self) -> bool {
        self.reasoning_open
    }

    /// Consume one upstream chunk and return the outbound frame payloads
    /// for every line it completes
    ///
    /// A trailing partial line stays buffered until a later chunk
    /// completes it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.carry.extend_from_slice(chunk);

        let Some(end) = self.carry.iter().rposition(|&byte| byte == b'\n') else {
            return Vec::new();
        };

        let rest = self.carry.split_off(end + 1);
        let complete = std::mem::replace(&mut self.carry, rest);

        complete[..end]
            .split(|&byte| byte == b'\n')
            .filter_map(|line| self.process_line(line))
            .collect()
    }

    fn process_line(&mut self, line: &[u8]) -> Option<String> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let payload = String::from_utf8_lossy(line.strip_prefix(DATA_PREFIX)?);
        if let Cow::Owned(_) = payload {
            tracing::debug!("replaced invalid UTF-8 in upstream SSE line");
        }

        if payload == DONE_SENTINEL {
            return Some(DONE_SENTINEL.to_owned());
        }

        let Ok(mut frame) = serde_json::from_str::<Value>(&payload) else {
            // A bare CR cannot be carried inside an SSE data field
            if payload.contains('\r') {
                tracing::debug!("dropping unparseable SSE line containing a carriage return");
                return None;
            }
            return Some(payload.into_owned());
        };

        if let Some(delta) = frame.pointer_mut("/choices/0/delta").and_then(Value::as_object_mut) {
            self.rewrite_delta(delta);
        }

        Some(frame.to_string())
    }

    fn rewrite_delta(&mut self, delta: &mut Map<String, Value>) {
        let reasoning = delta.remove("reasoning_content").and_then(non_empty_text);
        let answer = delta.get("content").cloned().and_then(non_empty_text);

        let content = match self.display {
            ReasoningDisplay::Hide => answer.unwrap_or_default(),
            ReasoningDisplay::Show => {
                let mut merged = String::new();

                if let Some(reasoning) = reasoning {
                    if !self.reasoning_open {
                        merged.push_str(THINK_OPEN);
                        self.reasoning_open = true;
                    }
                    merged.push_str(&reasoning);
                }

                if let Some(answer) = answer {
                    if self.reasoning_open {
                        merged.push_str(THINK_CLOSE);
                        self.reasoning_open = false;
                    }
                    merged.push_str(&answer);
                }

                merged
            }
        };

        delta.insert("content".to_owned(), Value::String(content));
    }
}

impl Drop for StreamTranscoder {
    fn drop(&mut self) {
        if !self.carry.is_empty() {
            tracing::debug!(bytes = self.carry.len(), "discarding incomplete trailing SSE line");
        }
    }
}

/// Empty strings count as absent
fn non_empty_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text),
        _ => None,
    }
}

/// Transcode an upstream SSE byte stream into outbound frame payloads
///
/// An upstream transport error ends the outbound stream; nothing is sent
/// to the caller for it beyond what was already forwarded.
pub fn transcode_stream<S, E>(upstream: S, display: ReasoningDisplay) -> impl Stream<Item = String> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display,
{
    upstream
        .scan(StreamTranscoder::new(display), |transcoder, chunk| {
            let frames = match chunk {
                Ok(bytes) => Some(transcoder.push(&bytes)),
                Err(error) => {
                    tracing::warn!(error = %error, "upstream stream failed, ending response");
                    None
                }
            };
            future::ready(frames)
        })
        .flat_map(stream::iter)
}
