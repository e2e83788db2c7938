//! HTTP server assembly for Tessera

#![allow(clippy::must_use_candidate)]

mod cors;
mod fallback;
mod health;

use std::net::SocketAddr;

use axum::{Router, routing};
use tessera_config::Config;
use tessera_llm::LlmState;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy state cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let llm_state = LlmState::from_config(config)?;

        Ok(Self::with_state(config, llm_state))
    }

    /// Build the server around pre-built proxy state
    pub fn with_state(config: &Config, llm_state: LlmState) -> Self {
        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(
                &config.server.health.path,
                routing::get(health::health_handler).with_state(config.reasoning),
            );
        }

        app = app
            .merge(tessera_llm::llm_router(llm_state))
            .fallback(fallback::not_found);

        // Middleware, innermost first. The timeout covers producing the
        // response head; streamed bodies continue past it.
        app = app
            .layer(TimeoutLayer::new(config.server.request_timeout))
            .layer(TraceLayer::new_for_http());

        if config.server.cors.enabled {
            app = app.layer(cors::cors_layer(&config.server.cors));
        }

        Self {
            router: app,
            listen_address: config.server.listen_address(),
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered. In-flight
    /// requests, including open streams, are allowed to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
