//! Axum Router Configuration
//!
//! This module defines the HTTP routing for the gateway: the ask route and
//! the generated OpenAPI document.

use crate::{
    handlers,
    models::{AskPayload, AskResponse, ErrorResponse},
    state::AppState,
};

use axum::{
    Json, Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::ask),
    components(schemas(AskPayload, AskResponse, ErrorResponse)),
    tags(
        (name = "Vesper Gateway", description = "Prompt relay to an upstream language model")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/ask", post(handlers::ask))
        .with_state(app_state);

    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api_router)
}
