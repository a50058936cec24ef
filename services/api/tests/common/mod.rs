//! Shared test utilities

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vesper_api::{router::create_router, state::AppState};
use vesper_core::llm_client::CompletionClient;

/// A completion client that replays scripted replies and records every prompt.
///
/// `Ok` entries are returned as completions, `Err` entries become upstream
/// failures with that message. Once the script runs out, the last entry
/// repeats.
pub struct StubCompletion {
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Result<String, String>>,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    pub fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        let last = replies
            .last()
            .cloned()
            .unwrap_or_else(|| Err("no scripted reply".to_string()));
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(last),
            prompts: Mutex::new(vec![]),
        })
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => self.last.lock().unwrap().clone(),
        };
        reply.map_err(anyhow::Error::msg)
    }
}

/// Builds the gateway router around `stub`.
pub fn build_test_router(stub: Arc<StubCompletion>) -> axum::Router {
    create_router(Arc::new(AppState::new(stub)))
}
