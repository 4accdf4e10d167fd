use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiError;
use crate::models::{capitalize, Resource};
use crate::state::AppState;

/// PATCH /api/{resource}/:id - forward a partial update to the external API
pub async fn patch<R: Resource>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    id: Option<Path<String>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = require_id::<R>(id)?;

    let payload: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid_json("Invalid JSON"))?;

    let internal = || ApiError::internal_server_error(format!("Internal error while updating {}", R::LABEL));
    let token = state.tokens.issue(&session).map_err(|e| {
        tracing::error!("failed to issue access token for {}: {}", session.user_id, e);
        internal()
    })?;
    let url = state.upstream.endpoint(&[R::PATH, &id]).map_err(|e| {
        tracing::error!("cannot build upstream URL: {}", e);
        internal()
    })?;

    tracing::debug!("PATCH {} for user {}", url, session.user_id);
    let res = state
        .upstream
        .http
        .patch(url)
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("PATCH {} {} failed: {}", R::LABEL, id, e);
            internal()
        })?;

    let status = res.status();
    let bytes = res.bytes().await.map_err(|e| {
        tracing::error!("reading upstream body for {} {} failed: {}", R::LABEL, id, e);
        internal()
    })?;

    if !status.is_success() {
        tracing::warn!("upstream rejected PATCH {} {}: {}", R::LABEL, id, status);
        return Err(ApiError::upstream(
            status,
            format!("Failed to update {}: {}", R::LABEL, reason(status)),
            serde_json::from_slice::<Value>(&bytes).ok(),
        ));
    }

    let data: Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!("upstream returned non-JSON for {} {}: {}", R::LABEL, id, e);
        internal()
    })?;

    Ok((status, Json(data)).into_response())
}

/// DELETE /api/{resource}/:id - forward a deletion to the external API
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    id: Option<Path<String>>,
) -> Result<Response, ApiError> {
    let id = require_id::<R>(id)?;

    let internal = || ApiError::internal_server_error(format!("Internal error while deleting {}", R::LABEL));
    let token = state.tokens.issue(&session).map_err(|e| {
        tracing::error!("failed to issue access token for {}: {}", session.user_id, e);
        internal()
    })?;
    let url = state.upstream.endpoint(&[R::PATH, &id]).map_err(|e| {
        tracing::error!("cannot build upstream URL: {}", e);
        internal()
    })?;

    tracing::debug!("DELETE {} for user {}", url, session.user_id);
    let res = state
        .upstream
        .http
        .delete(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("DELETE {} {} failed: {}", R::LABEL, id, e);
            internal()
        })?;

    let status = res.status();
    if !status.is_success() {
        tracing::warn!("upstream rejected DELETE {} {}: {}", R::LABEL, id, status);
        return Err(ApiError::upstream(
            status,
            format!("Failed to delete {}: {}", R::LABEL, reason(status)),
            None,
        ));
    }

    let message = format!("{} deleted successfully.", capitalize(R::LABEL));
    Ok((StatusCode::OK, Json(json!({ "message": message }))).into_response())
}

fn require_id<R: Resource>(id: Option<Path<String>>) -> Result<String, ApiError> {
    match id {
        Some(Path(id)) if !id.trim().is_empty() => Ok(id),
        _ => Err(ApiError::bad_request(format!("Missing {} ID", R::LABEL))),
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown status")
}
