// handlers/public/auth.rs - account creation and token acquisition

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::{self, Claims};
use crate::database::models::NewUser;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::json_rejection;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/signup - create an account and return a token
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(json_rejection)?;

    let (Some(name), Some(email), Some(password)) = (
        non_blank(request.name),
        non_blank(request.email).map(|e| e.to_lowercase()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let cost = state.config.security.bcrypt_cost;
    let password_hash = tokio::task::spawn_blocking(move || auth::hash_password(&password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Server error")
        })??;

    let user = state
        .store
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => ApiError::bad_request("Email already registered"),
            other => other.into(),
        })?;

    let token = auth::generate_jwt(
        &Claims::new(user.id, &user.name, state.config.security.jwt_expiry_hours),
        &state.config.security,
    )?;

    tracing::info!("New account {} ({})", user.id, user.email);

    Ok(ApiResponse::created(json!({
        "message": "Signup successful",
        "token": token
    })))
}

/// POST /api/auth/login - verify credentials and return a token
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(json_rejection)?;

    let (Some(email), Some(password)) = (
        non_blank(request.email).map(|e| e.to_lowercase()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    // Same answer for unknown email and wrong password
    let invalid = || ApiError::bad_request("Invalid email or password");

    let user = state.store.find_user_by_email(&email).await?.ok_or_else(|| {
        tracing::debug!("Login for unknown email {}", email);
        invalid()
    })?;

    let hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("Server error")
        })?;
    if !matches {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(invalid());
    }

    let token = auth::generate_jwt(
        &Claims::new(user.id, &user.name, state.config.security.jwt_expiry_hours),
        &state.config.security,
    )?;

    Ok(ApiResponse::success(json!({
        "message": "Login successful",
        "token": token
    })))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
