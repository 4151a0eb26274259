use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{error::AppError, state::RelayState, utils::parse_body};

pub async fn status_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "NutriSense relay is running" })),
    )
}

/// Forwards the form payload to the AI service and hands its answer back as is.
pub async fn recipe_handler(
    State(state): State<Arc<RelayState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload = parse_body(&body)?;
    let query = payload.get("query").and_then(Value::as_str).unwrap_or_default();
    info!("Forwarding recipe request for {query:?}");

    let answer = state.upstream.forward(body).await.map_err(|e| {
        error!("Error forwarding request to AI service: {e}");
        e
    })?;

    info!("Received response from AI service");

    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], answer).into_response())
}
