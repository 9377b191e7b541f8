use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{NewProject, Project};
use crate::error::ApiError;
use crate::handlers::json_rejection;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

const PREFIX_MAX_LEN: usize = 64;

/// First path segments under /api that belong to the API itself. A project
/// with one of these prefixes could never be reached.
const RESERVED_PREFIXES: &[&str] = &["auth", "projects", "resources", "protected"];

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub prefix: Option<String>,
}

/// GET /api/projects - the caller's projects
pub async fn projects_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Project>> {
    let projects = state.store.list_projects(user.id).await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/projects - create a project; the prefix defaults to a slug of the name
pub async fn projects_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(json_rejection)?;

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Project name is required"))?;

    let prefix = match request.prefix.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
        Some(explicit) => explicit,
        None => slugify(&name),
    };
    validate_prefix(&prefix).map_err(ApiError::bad_request)?;

    let project = state
        .store
        .create_project(NewProject {
            user_id: user.id,
            name,
            prefix,
        })
        .await?;

    tracing::info!("User {} created project {} ({})", user.id, project.id, project.prefix);

    Ok(ApiResponse::created(json!({
        "message": "Project created",
        "projectId": project.id,
        "prefix": project.prefix
    })))
}

/// DELETE /api/projects/:id - delete a project with its resources and fields
pub async fn project_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    if !state.store.delete_project(user.id, id).await? {
        return Err(ApiError::not_found("Project not found"));
    }

    tracing::info!("User {} deleted project {}", user.id, id);
    Ok(ApiResponse::success(json!({ "message": "Project deleted" })))
}

/// Lowercase the name, turn whitespace runs into `-`, drop anything else
/// that is not allowed in a prefix.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for word in name.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(
            word.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| is_prefix_char(*c)),
        );
    }
    slug.chars().take(PREFIX_MAX_LEN).collect()
}

pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() || prefix.len() > PREFIX_MAX_LEN {
        return Err(format!("Project prefix must be 1 to {} characters", PREFIX_MAX_LEN));
    }
    if !prefix.chars().all(is_prefix_char) {
        return Err("Project prefix can only contain lowercase letters, digits, '-' and '_'".to_string());
    }
    if RESERVED_PREFIXES.contains(&prefix) {
        return Err(format!("Project prefix '{}' is reserved", prefix));
    }
    Ok(())
}

fn is_prefix_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Shop", "shop")]
    #[case("My  Cool Project", "my-cool-project")]
    #[case("Café API!", "caf-api")]
    #[case("already_ok-1", "already_ok-1")]
    fn slugify_derives_url_safe_prefixes(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[test]
    fn slugify_caps_length() {
        assert_eq!(slugify(&"a".repeat(200)).len(), PREFIX_MAX_LEN);
    }

    #[rstest]
    #[case("shop")]
    #[case("shop-2_b")]
    fn accepts_valid_prefixes(#[case] prefix: &str) {
        assert!(validate_prefix(prefix).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Shop")]
    #[case("has space")]
    #[case("a/b")]
    #[case("resources")]
    #[case("auth")]
    fn rejects_invalid_or_reserved_prefixes(#[case] prefix: &str) {
        assert!(validate_prefix(prefix).is_err());
    }
}
