// handlers/public/generate.rs - GET /api/:prefix/:resource
//
// The mock endpoint each resource exposes. No token: this is the API the
// tool generates for its users.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::generator::MockRecord;

/// Resolve the resource once, then synthesize `count` fresh records.
///
/// - unknown prefix or unknown resource: 404 `Resource not found` (the two are
///   indistinguishable to the caller)
/// - resource without fields: 500 `Fields not found`, since resources are
///   never created without fields
/// - store failure: 500 with the detail only in the log
pub async fn generate_get(
    State(state): State<AppState>,
    Path((prefix, resource_name)): Path<(String, String)>,
) -> Result<Json<Vec<MockRecord>>, ApiError> {
    let resource = state
        .store
        .lookup_resource(&prefix, &resource_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;

    let fields = state.store.list_fields(resource.resource_id).await?;
    if fields.is_empty() {
        tracing::error!(
            "Resource {} ({}/{}) has no fields",
            resource.resource_id,
            prefix,
            resource_name
        );
        return Err(ApiError::internal_server_error("Fields not found"));
    }

    let records = state.synthesizer.synthesize(&fields, resource.record_count());
    tracing::debug!(
        "Generated {} records with {} fields for {}/{}",
        records.len(),
        fields.len(),
        prefix,
        resource_name
    );

    Ok(Json(records))
}
