use axum::{extract::Path, response::Json, Extension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::CasePayload;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::case_service::CaseService;

use super::resolve_program;

fn parse_case_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request(format!("invalid case id: {}", id)))
}

/// GET /api/:program/cases/:id - Get a single case by ID
pub async fn get(
    Path((program, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let id = parse_case_id(&id)?;
    let service = CaseService::new(program).await?;

    let case = service.retrieve(user.user_id, id).await?;

    Ok(Json(json!({ "success": true, "data": case })))
}

/// PUT /api/:program/cases/:id - Full update of the mutable fields
pub async fn put(
    Path((program, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let id = parse_case_id(&id)?;
    let service = CaseService::new(program).await?;

    let payload: CasePayload =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let case = service.update(user.user_id, id, payload).await?;

    Ok(Json(json!({ "success": true, "data": case })))
}

/// PATCH /api/:program/cases/:id - Partial update; absent fields unchanged
pub async fn patch(
    Path((program, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let id = parse_case_id(&id)?;
    let service = CaseService::new(program).await?;

    let payload: CasePayload =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let case = service.patch(user.user_id, id, payload).await?;

    Ok(Json(json!({ "success": true, "data": case })))
}

/// DELETE /api/:program/cases/:id - Permanently remove a case
pub async fn delete(
    Path((program, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let id = parse_case_id(&id)?;
    let service = CaseService::new(program).await?;

    service.delete(user.user_id, id).await?;

    tracing::info!("Deleted {} case {}", program.table(), id);

    Ok(Json(json!({ "success": true, "data": { "id": id, "deleted": true } })))
}
