//! Storage contracts used by the HTTP handlers.
//!
//! The public generation path only needs [`MetadataStore`]; the management
//! API uses the rest. [`PgStore`](super::PgStore) implements all of them.

use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{NewProject, NewResource, NewUser, Project, Resource, ResourceRef, ResourceSummary, User};
use crate::generator::FieldSpec;

/// Read contract for resolving a public endpoint to its resource
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Find the resource named `resource_name` in the project with `prefix`.
    /// A missing project and a missing resource are both `None`.
    async fn lookup_resource(
        &self,
        prefix: &str,
        resource_name: &str,
    ) -> Result<Option<ResourceRef>, DatabaseError>;

    /// Fields of a resource in declaration order
    async fn list_fields(&self, resource_id: i64) -> Result<Vec<FieldSpec>, DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fails with `Conflict` when the prefix is taken
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError>;

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, DatabaseError>;

    async fn find_project(&self, user_id: i64, project_id: i64) -> Result<Option<Project>, DatabaseError>;

    /// Remove the project with all of its resources and fields.
    /// Returns `false` when `user_id` owns no such project.
    async fn delete_project(&self, user_id: i64, project_id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Insert the resource and its fields together.
    /// Fails with `Conflict` when the project already has a resource with that name.
    async fn create_resource(&self, resource: NewResource) -> Result<Resource, DatabaseError>;

    /// Resources of the project with `prefix`, only if `user_id` owns it
    async fn list_resources(&self, user_id: i64, prefix: &str) -> Result<Vec<ResourceSummary>, DatabaseError>;

    /// Remove the resource and its fields.
    /// Returns `false` when `user_id` owns no such resource.
    async fn delete_resource(&self, user_id: i64, resource_id: i64) -> Result<bool, DatabaseError>;
}

/// Everything the application needs from persistence
#[async_trait]
pub trait Store: MetadataStore + UserStore + ProjectStore + ResourceStore {
    /// Cheap connectivity check for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;
}
