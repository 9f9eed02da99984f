use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::AppState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct CacheValue {
    pub value: String,
}

pub async fn set_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<CacheValue>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.cache.set(&key, &input.value).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// Returns the stored value as a JSON string; 404 when the key is absent.
pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<String>, ApiError> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(value)),
        None => Err(ApiError::not_found("key not found")),
    }
}

/// 删除键；键不存在时返回 ok:false
pub async fn delete_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.cache.delete(&key).await?;
    Ok(Json(serde_json::json!({"ok": removed})))
}
