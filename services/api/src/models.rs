//! API Models
//!
//! Request and response bodies for the gateway, annotated for OpenAPI
//! generation with `utoipa`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/ask`. A missing prompt is reported as a bad request,
/// not as a deserialization failure.
#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct AskPayload {
    #[schema(example = "Tell me a joke")]
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct AskResponse {
    #[schema(example = "Why did the scarecrow win an award?")]
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
