//! HTTP client for the completion gateway's `POST /api/ask` route.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Failures talking to the gateway. Both map to the same user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gateway reply was not valid JSON: {0}")]
    Parse(String),
}

#[derive(Serialize, Debug)]
struct AskRequest<'a> {
    prompt: &'a str,
}

/// The subset of the gateway reply the client reads. Error replies carry no
/// `response` field and deserialize to `None`.
#[derive(Deserialize, Debug, Default)]
struct AskReply {
    #[serde(default)]
    response: Option<String>,
}

/// Sends a prompt to the completion gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Returns the gateway's `response` field, or `None` when the reply
    /// parsed but carried no answer.
    async fn ask(&self, prompt: &str) -> Result<Option<String>, GatewayError>;
}

/// A `GatewayClient` speaking JSON over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGatewayClient {
    /// Creates a client for the gateway rooted at `base_url`,
    /// e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/ask", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn ask(&self, prompt: &str) -> Result<Option<String>, GatewayError> {
        let reply = self
            .client
            .post(&self.endpoint)
            .json(&AskRequest { prompt })
            .send()
            .await?;

        let status = reply.status();
        let body = reply.bytes().await?;
        let parsed: AskReply =
            serde_json::from_slice(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, "Gateway answered with an error status");
        }
        Ok(parsed.response)
    }
}
