use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/protected - token check for the frontend
pub async fn greeting_get(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "message": format!("Hello {}, this is protected data.", user.name)
    })))
}
