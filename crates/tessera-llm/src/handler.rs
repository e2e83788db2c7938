//! Axum route handlers for the OpenAI-compatible surface

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt};
use tessera_core::{ErrorEnvelope, HttpError};

use crate::protocol::ChatRequest;
use crate::state::LlmState;

/// Build the proxy router
pub fn llm_router(state: LlmState) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/models", routing::get(list_models))
        .with_state(state)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(State(state): State<LlmState>, payload: Result<Json<ChatRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(&rejection),
    };

    if request.is_stream() {
        match state.complete_stream(request).await {
            Ok(stream) => stream_response(stream, state.keepalive_interval()).into_response(),
            Err(e) => error_response(&e),
        }
    } else {
        match state.complete(request).await {
            Ok(completion) => Json(completion).into_response(),
            Err(e) => error_response(&e),
        }
    }
}

/// Envelope for a body the JSON extractor refused
///
/// Well-formed JSON of the wrong shape (e.g. `messages` not an array) is a
/// 400; other rejections keep the extractor's status.
fn rejection_response(rejection: &JsonRejection) -> Response {
    let status = match rejection {
        JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    };

    tracing::debug!(%status, error = %rejection.body_text(), "rejected chat completion body");

    let envelope = ErrorEnvelope::new(status, "invalid_request_error", rejection.body_text());
    (status, Json(envelope)).into_response()
}

/// Handle `GET /v1/models`
async fn list_models(State(state): State<LlmState>) -> Response {
    Json(state.list_models()).into_response()
}

/// Wrap transcoded payloads as SSE `data:` frames with idle keepalives
fn stream_response<S>(stream: S, keepalive: Duration) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = String> + Send + 'static,
{
    let events = stream.map(|payload| Ok(Event::default().data(payload)));

    Sse::new(events).keep_alive(KeepAlive::new().interval(keepalive))
}

/// Convert a domain error into a caller-dialect JSON error response
pub fn error_response<E: HttpError>(error: &E) -> Response {
    (error.status_code(), Json(error.envelope())).into_response()
}
