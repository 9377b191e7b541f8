use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::config::GenerationConfig;
use crate::database::models::{NewResource, ResourceSummary};
use crate::error::ApiError;
use crate::generator::{FieldKind, FieldSpec};
use crate::handlers::json_rejection;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub project_id: Option<i64>,
    pub name: Option<String>,
    pub fields: Option<Vec<FieldSpec>>,
    pub count: Option<i32>,
}

/// GET /api/resources/:prefix - resources of one of the caller's projects
pub async fn resources_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(prefix): Path<String>,
) -> ApiResult<Vec<ResourceSummary>> {
    let resources = state.store.list_resources(user.id, &prefix).await?;
    Ok(ApiResponse::success(resources))
}

/// POST /api/resources - define a resource and its fields
pub async fn resources_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(json_rejection)?;
    let new_resource = validate_request(request, &state.config.generation)?;

    let project = state
        .store
        .find_project(user.id, new_resource.project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    for field in &new_resource.fields {
        if field.kind().is_none() {
            tracing::warn!(
                "Field {} of {}/{} has unknown type {:?}, values fall back to {}",
                field.name,
                project.prefix,
                new_resource.name,
                field.field_type,
                FieldKind::Word
            );
        }
    }

    let resource = state.store.create_resource(new_resource).await?;
    let endpoint = format!("/api/{}/{}", project.prefix, resource.name);

    tracing::info!("User {} created resource {} at {}", user.id, resource.id, endpoint);

    Ok(ApiResponse::created(json!({
        "message": "Resource created",
        "resourceId": resource.id,
        "endpoint": endpoint
    })))
}

/// DELETE /api/resources/:id - remove a resource and its fields
pub async fn resource_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    if !state.store.delete_resource(user.id, id).await? {
        return Err(ApiError::not_found("Resource not found"));
    }

    tracing::info!("User {} deleted resource {}", user.id, id);
    Ok(ApiResponse::success(json!({ "message": "Resource deleted" })))
}

fn validate_request(request: CreateResourceRequest, limits: &GenerationConfig) -> Result<NewResource, ApiError> {
    let invalid = || ApiError::bad_request("Invalid resource data");

    let project_id = request.project_id.ok_or_else(invalid)?;
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(invalid)?;
    let fields = request.fields.filter(|f| !f.is_empty()).ok_or_else(invalid)?;

    if name.contains('/') {
        return Err(ApiError::bad_request("Resource name cannot contain '/'"));
    }

    let fields = fields
        .into_iter()
        .map(|field| {
            let field_name = field.name.trim();
            if field_name.is_empty() {
                return Err(ApiError::bad_request("Field name is required"));
            }
            Ok(FieldSpec::new(field_name, field.field_type.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = request.count.unwrap_or(limits.default_count);
    if !(0..=limits.max_count).contains(&count) {
        return Err(ApiError::bad_request(format!(
            "Count must be between 0 and {}",
            limits.max_count
        )));
    }

    Ok(NewResource {
        project_id,
        name,
        count,
        fields,
    })
}
