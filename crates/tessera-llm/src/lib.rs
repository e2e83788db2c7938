//! Request/response transcoding pipeline for Tessera
//!
//! Resolves caller model names to upstream models, reshapes messages to
//! what the resolved model accepts, builds the upstream request, and
//! transcodes upstream responses (including SSE streams carrying separate
//! reasoning fragments) back into the caller's chat-completion dialect.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod capabilities;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod normalize;
pub mod protocol;
pub mod request;
pub mod resolver;
pub mod state;
pub mod transcode;
pub mod upstream;

pub use capabilities::ModelCapabilities;
pub use error::LlmError;
#[cfg(feature = "http")]
pub use handler::{error_response, llm_router};
pub use resolver::{
    ModelProbe, ModelResolver, ProbeOutcome, Resolution, ResolutionSource, SizeTier, ValidatedModelCache,
    ValidatedModels,
};
pub use state::LlmState;
pub use transcode::{ReasoningDisplay, StreamTranscoder};
pub use upstream::UpstreamClient;
