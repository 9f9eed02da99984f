use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;

use service::object::ObjectClient;

use crate::auth::AppState;
use crate::errors::ApiError;

/// Direct passthrough endpoints require object storage to be configured;
/// otherwise they answer 400 rather than degrading silently.
fn require_objects(state: &AppState) -> Result<&ObjectClient, ApiError> {
    state
        .objects
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("S3_BUCKET not configured"))
}

pub async fn put_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = require_objects(&state)?;
    let key = store.put(&id, Bytes::from(body)).await?;
    Ok(Json(serde_json::json!({"ok": true, "key": key})))
}

/// Returns the raw object body; 404 when the key does not exist.
pub async fn get_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let store = require_objects(&state)?;
    let bytes = store.get(&id).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn delete_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = require_objects(&state)?;
    store.delete(&id).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}
