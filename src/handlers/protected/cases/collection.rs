use axum::{extract::Path, response::Json, Extension};
use serde_json::{json, Value};

use crate::database::models::CasePayload;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::case_service::CaseService;

use super::resolve_program;

/// GET /api/:program/cases - List cases visible to the actor, newest first
pub async fn get(
    Path(program): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let service = CaseService::new(program).await?;

    let cases = service.list(user.user_id).await?;

    Ok(Json(json!({ "success": true, "data": cases })))
}

/// POST /api/:program/cases - Create a case owned by the actor
pub async fn post(
    Path(program): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let service = CaseService::new(program).await?;

    let payload: CasePayload =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let case = service.create(user.user_id, payload).await?;

    tracing::info!(
        "Created {} case {} in {} for {}",
        program.table(),
        case.id,
        case.district,
        user.username
    );

    Ok(Json(json!({ "success": true, "data": case })))
}

/// GET /api/:program/cases/by-district - Count of the actor's own cases per
/// district, ascending by district. Owner-scoped for both programs.
pub async fn by_district(
    Path(program): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let program = resolve_program(&program)?;
    let service = CaseService::new(program).await?;

    let counts = service.count_by_district(user.user_id).await?;

    Ok(Json(json!({ "success": true, "data": counts })))
}
