use std::sync::Arc;

use axum::{
    Form, Json,
    body::Bytes,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rsvp::SubmissionResult;
use serde_json::Value;
use tracing::warn;

use crate::{error::AppError, state::AppState, utils::draft_from_pairs};

pub async fn rsvp_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejecting RSVP body, not JSON: {e}");
        AppError::MalformedPayload
    })?;

    Ok(respond(state.handler.handle_json(body).await))
}

pub async fn rsvp_form_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(pairs) = payload.map_err(|e| {
        warn!("Rejecting RSVP form: {e}");
        AppError::MalformedPayload
    })?;

    Ok(respond(state.handler.handle(draft_from_pairs(pairs)).await))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn respond(result: SubmissionResult) -> impl IntoResponse {
    let status = if result.success {
        StatusCode::OK
    } else if result.has_field_errors() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    };

    (status, Json(result))
}
