use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: Option<String>,
}

/// POST /auth/register - Create a new user account
pub async fn register(Json(payload): Json<Value>) -> Result<Json<Value>, ApiError> {
    let req: RegisterRequest =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let username = match req.username.as_deref().map(str::trim) {
        None | Some("") => {
            let mut field_errors = HashMap::new();
            field_errors.insert("username".to_string(), "This field is required".to_string());
            return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
        }
        Some(name) => name.to_string(),
    };

    let pool = DatabaseManager::pool().await?;

    let user: User = match sqlx::query_as("INSERT INTO users (username) VALUES ($1) RETURNING *")
        .bind(&username)
        .fetch_one(&pool)
        .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(ApiError::conflict(format!("username already taken: {}", username)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(Json(json!({ "success": true, "data": user })))
}
