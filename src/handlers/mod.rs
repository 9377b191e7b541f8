// handlers/mod.rs - two handler tiers
//
// Public (no auth): service info, account signup/login and the generated
// mock endpoints under /api/:prefix/:resource.
// Protected (JWT auth): project and resource management.
pub mod protected;
pub mod public;

use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;

/// Turn a body extraction failure into the API's JSON error shape
pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}
