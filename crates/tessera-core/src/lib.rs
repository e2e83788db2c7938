//! Shared primitives for Tessera crates

#![allow(clippy::must_use_candidate)]

mod error;

pub use error::{ErrorBody, ErrorEnvelope, HttpError};
