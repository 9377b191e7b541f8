//! In-process store for tests that exercise the HTTP stack without Postgres.
//!
//! Enabled for unit tests and, through the `test-support` feature, for the
//! integration tests under `tests/`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::database::models::{NewProject, NewResource, NewUser, Project, Resource, ResourceRef, ResourceSummary, User};
use crate::database::{DatabaseError, MetadataStore, ProjectStore, ResourceStore, Store, UserStore};
use crate::generator::FieldSpec;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    projects: Vec<Project>,
    resources: Vec<Resource>,
    /// (resource_id, field) in insertion order
    fields: Vec<(i64, FieldSpec)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn fields_of(&self, resource_id: i64) -> Vec<FieldSpec> {
        self.fields
            .iter()
            .filter(|(id, _)| *id == resource_id)
            .map(|(_, field)| field.clone())
            .collect()
    }

    fn owns_resource(&self, user_id: i64, resource_id: i64) -> bool {
        self.resources.iter().any(|r| {
            r.id == resource_id
                && self
                    .projects
                    .iter()
                    .any(|p| p.id == r.project_id && p.user_id == user_id)
        })
    }
}

/// Same uniqueness and ownership rules as the Postgres store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails the way a dropped connection would
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        if *lock(&self.unavailable) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(lock(&self.tables))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn lookup_resource(
        &self,
        prefix: &str,
        resource_name: &str,
    ) -> Result<Option<ResourceRef>, DatabaseError> {
        let tables = self.tables()?;
        let Some(project) = tables.projects.iter().find(|p| p.prefix == prefix) else {
            return Ok(None);
        };
        Ok(tables
            .resources
            .iter()
            .find(|r| r.project_id == project.id && r.name == resource_name)
            .map(|r| ResourceRef {
                resource_id: r.id,
                count: r.count,
            }))
    }

    async fn list_fields(&self, resource_id: i64) -> Result<Vec<FieldSpec>, DatabaseError> {
        Ok(self.tables()?.fields_of(resource_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("Email already registered".to_string()));
        }

        let created = User {
            id: tables.next_id(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.projects.iter().any(|p| p.prefix == project.prefix) {
            return Err(DatabaseError::Conflict(format!(
                "Prefix '{}' is already in use",
                project.prefix
            )));
        }

        let created = Project {
            id: tables.next_id(),
            user_id: project.user_id,
            name: project.name,
            prefix: project.prefix,
            created_at: Utc::now(),
        };
        tables.projects.push(created.clone());
        Ok(created)
    }

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, DatabaseError> {
        Ok(self
            .tables()?
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_project(&self, user_id: i64, project_id: i64) -> Result<Option<Project>, DatabaseError> {
        Ok(self
            .tables()?
            .projects
            .iter()
            .find(|p| p.id == project_id && p.user_id == user_id)
            .cloned())
    }

    async fn delete_project(&self, user_id: i64, project_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        if !tables
            .projects
            .iter()
            .any(|p| p.id == project_id && p.user_id == user_id)
        {
            return Ok(false);
        }

        let resource_ids: Vec<i64> = tables
            .resources
            .iter()
            .filter(|r| r.project_id == project_id)
            .map(|r| r.id)
            .collect();
        tables.fields.retain(|(id, _)| !resource_ids.contains(id));
        tables.resources.retain(|r| r.project_id != project_id);
        tables.projects.retain(|p| p.id != project_id);
        Ok(true)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn create_resource(&self, resource: NewResource) -> Result<Resource, DatabaseError> {
        let mut tables = self.tables()?;
        if tables
            .resources
            .iter()
            .any(|r| r.project_id == resource.project_id && r.name == resource.name)
        {
            return Err(DatabaseError::Conflict(format!(
                "Resource '{}' already exists in this project",
                resource.name
            )));
        }

        let created = Resource {
            id: tables.next_id(),
            project_id: resource.project_id,
            name: resource.name,
            count: resource.count,
            created_at: Utc::now(),
        };
        tables.resources.push(created.clone());
        for field in resource.fields {
            tables.fields.push((created.id, field));
        }
        Ok(created)
    }

    async fn list_resources(&self, user_id: i64, prefix: &str) -> Result<Vec<ResourceSummary>, DatabaseError> {
        let tables = self.tables()?;
        let Some(project) = tables
            .projects
            .iter()
            .find(|p| p.prefix == prefix && p.user_id == user_id)
        else {
            return Ok(Vec::new());
        };

        Ok(tables
            .resources
            .iter()
            .filter(|r| r.project_id == project.id)
            .map(|r| ResourceSummary {
                id: r.id,
                name: r.name.clone(),
                count: r.count,
                fields: tables.fields_of(r.id),
            })
            .collect())
    }

    async fn delete_resource(&self, user_id: i64, resource_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        if !tables.owns_resource(user_id, resource_id) {
            return Ok(false);
        }

        tables.fields.retain(|(id, _)| *id != resource_id);
        tables.resources.retain(|r| r.id != resource_id);
        Ok(true)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.tables().map(|_| ())
    }
}
