use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{StatusCode, Uri};
use tessera_core::ErrorEnvelope;

/// Catch-all for unknown routes
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");

    let envelope = ErrorEnvelope::new(
        StatusCode::NOT_FOUND,
        "invalid_request_error",
        format!("Endpoint {} not found", uri.path()),
    );

    (StatusCode::NOT_FOUND, Json(envelope)).into_response()
}
