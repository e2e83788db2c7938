use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tessera_config::ReasoningConfig;

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    service: &'static str,
    reasoning_display: bool,
    thinking_mode: bool,
}

/// Health check handler; also reports the active reasoning policy
pub async fn health_handler(State(reasoning): State<ReasoningConfig>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "tessera",
        reasoning_display: reasoning.display,
        thinking_mode: reasoning.thinking_mode,
    })
}
