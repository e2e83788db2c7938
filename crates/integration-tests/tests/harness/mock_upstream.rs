//! Mock upstream inference API for integration tests
//!
//! Serves `POST /v1/chat/completions` with scripted behavior, records every
//! completion request it receives, and counts model probes separately.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// One completion request as seen by the upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

/// Scripted upstream behavior
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Models the probe confirms; everything else gets a 404
    pub known_models: Vec<String>,
    /// Delay before answering a probe
    pub probe_delay: Duration,
    pub content: String,
    pub reasoning: Option<String>,
    /// Raw body pieces sent, in order, for streamed requests
    pub stream_chunks: Vec<Bytes>,
    /// Delay before each streamed piece
    pub chunk_delay: Duration,
    /// Answer every completion request with this status and body
    pub failure: Option<(StatusCode, String)>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            known_models: Vec::new(),
            probe_delay: Duration::ZERO,
            content: "Hello from mock upstream".to_owned(),
            reasoning: None,
            stream_chunks: reasoning_stream(),
            chunk_delay: Duration::ZERO,
            failure: None,
        }
    }
}

/// Mock upstream server; shut down on drop
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: MockBehavior,
    requests: Mutex<Vec<RecordedRequest>>,
    probe_count: AtomicU32,
    streams_closed: AtomicU32,
}

/// Counts a streamed body as closed once hyper drops it
struct CloseGuard(Arc<MockState>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.streams_closed.fetch_add(1, Ordering::Relaxed);
    }
}

impl MockUpstream {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockBehavior::default()).await
    }

    pub async fn start_with(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
            probe_count: AtomicU32::new(0),
            streams_closed: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including `/v1`, as the proxy appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn probe_count(&self) -> u32 {
        self.state.probe_count.load(Ordering::Relaxed)
    }

    /// Streamed response bodies that have been dropped, finished or not
    pub fn streams_closed(&self) -> u32 {
        self.state.streams_closed.load(Ordering::Relaxed)
    }

    /// Completion requests received so far, probes excluded
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Body of the most recent completion request
    pub fn last_body(&self) -> Value {
        self.requests().last().expect("upstream saw a completion request").body.clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// `data:` line carrying one delta
pub fn delta_frame(delta: &Value) -> String {
    let chunk = json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "mock",
        "choices": [{"index": 0, "delta": delta, "finish_reason": null}]
    });
    format!("data: {chunk}\n\n")
}

/// Stream with two reasoning fragments followed by two answer fragments
pub fn reasoning_stream() -> Vec<Bytes> {
    to_chunks([
        delta_frame(&json!({"role": "assistant", "content": ""})),
        delta_frame(&json!({"reasoning_content": "Thinking"})),
        delta_frame(&json!({"reasoning_content": " hard"})),
        delta_frame(&json!({"content": "Hello"})),
        delta_frame(&json!({"content": " world"})),
        "data: [DONE]\n\n".to_owned(),
    ])
}

/// One network write per string
pub fn to_chunks(parts: impl IntoIterator<Item = String>) -> Vec<Bytes> {
    parts.into_iter().map(Bytes::from).collect()
}

fn is_probe(body: &Value) -> bool {
    body.get("max_tokens") == Some(&json!(1)) && body.get("temperature").is_none()
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let behavior = &state.behavior;

    if is_probe(&body) {
        state.probe_count.fetch_add(1, Ordering::Relaxed);
        let model = body["model"].as_str().unwrap_or_default();

        if !behavior.probe_delay.is_zero() {
            tokio::time::sleep(behavior.probe_delay).await;
        }

        return if behavior.known_models.iter().any(|known| known == model) {
            Json(json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": "o"}}]})).into_response()
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"message": format!("model {model} not found")}})),
            )
                .into_response()
        };
    }

    let header_value = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    state.requests.lock().unwrap().push(RecordedRequest {
        body: body.clone(),
        authorization: header_value(header::AUTHORIZATION),
        accept: header_value(header::ACCEPT),
    });

    if let Some((status, error_body)) = &behavior.failure {
        return (*status, [(header::CONTENT_TYPE, "application/json")], error_body.clone()).into_response();
    }

    if body["stream"] == json!(true) {
        let chunks = behavior.stream_chunks.clone();
        let delay = behavior.chunk_delay;
        let guard = CloseGuard(Arc::clone(&state));
        let stream = futures_util::stream::unfold((chunks.into_iter(), guard), move |(mut chunks, guard)| async move {
            let chunk = chunks.next()?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Some((Ok::<_, Infallible>(chunk), (chunks, guard)))
        });

        return Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(Body::from_stream(stream))
            .unwrap();
    }

    let mut message = json!({"role": "assistant", "content": behavior.content});
    if let Some(reasoning) = &behavior.reasoning {
        message["reasoning_content"] = json!(reasoning);
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": body["model"],
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .into_response()
}
