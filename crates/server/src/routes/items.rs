use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AppState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// 创建条目；id 与 created_at 由服务端生成
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<ItemInput>,
) -> Result<Json<models::item::Model>, ApiError> {
    let created = models::item::create(&state.db, &input.name, input.value).await?;
    Ok(Json(created))
}

pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<models::item::Model>>, ApiError> {
    let items = models::item::list(&state.db).await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::item::Model>, ApiError> {
    match models::item::find(&state.db, id).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::not_found("item not found")),
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ItemInput>,
) -> Result<Json<models::item::Model>, ApiError> {
    match models::item::update(&state.db, id, &input.name, input.value).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::not_found("item not found")),
    }
}

/// 删除条目；重复删除返回 ok:false（幂等）
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = models::item::delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"ok": deleted})))
}
