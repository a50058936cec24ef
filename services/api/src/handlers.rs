//! Axum Handlers for the Completion Gateway
//!
//! The gateway has a single route that relays one prompt to the upstream
//! completion provider. It uses `utoipa` doc comments to generate OpenAPI
//! documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    models::{AskPayload, AskResponse, ErrorResponse},
    state::AppState,
};

pub const NO_PROMPT_MESSAGE: &str = "No prompt provided";
pub const UPSTREAM_ERROR_MESSAGE: &str = "OpenAI error";

pub enum ApiError {
    BadRequest(String),
    Upstream(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: message,
                    details: None,
                }),
            )
                .into_response(),
            ApiError::Upstream(err) => {
                error!("Upstream completion failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: UPSTREAM_ERROR_MESSAGE.to_string(),
                        details: Some(err.to_string()),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Upstream(err.into())
    }
}

/// Relay a prompt to the upstream language model and return its completion.
#[utoipa::path(
    post,
    path = "/api/ask",
    request_body = AskPayload,
    responses(
        (status = 200, description = "Completion text", body = AskResponse),
        (status = 400, description = "No prompt provided", body = ErrorResponse),
        (status = 500, description = "Upstream provider error", body = ErrorResponse)
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskPayload>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let prompt = match payload {
        Ok(Json(AskPayload {
            prompt: Some(prompt),
        })) if !prompt.is_empty() => prompt,
        Ok(_) => return Err(ApiError::BadRequest(NO_PROMPT_MESSAGE.to_string())),
        Err(rejection) => {
            debug!(%rejection, "Rejected unreadable request body");
            return Err(ApiError::BadRequest(NO_PROMPT_MESSAGE.to_string()));
        }
    };

    info!(prompt_len = prompt.len(), "Forwarding prompt upstream");
    let completion = state.completion_client.complete(&prompt).await?;

    Ok(Json(AskResponse {
        response: completion.trim().to_string(),
    }))
}
