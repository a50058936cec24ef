//! Shared Application State
//!
//! Everything here is immutable after startup, so concurrent requests share
//! no mutable state.

use std::sync::Arc;
use vesper_core::llm_client::CompletionClient;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub completion_client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(completion_client: Arc<dyn CompletionClient>) -> Self {
        Self { completion_client }
    }
}
