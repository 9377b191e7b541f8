use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewProject, NewResource, NewUser, Project, Resource, ResourceRef, ResourceSummary, User};
use crate::database::store::{MetadataStore, ProjectStore, ResourceStore, Store, UserStore};
use crate::generator::FieldSpec;

/// Postgres-backed store for users, projects, resources and fields
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgStore {
    async fn lookup_resource(
        &self,
        prefix: &str,
        resource_name: &str,
    ) -> Result<Option<ResourceRef>, DatabaseError> {
        let found = sqlx::query_as::<_, ResourceRef>(
            "SELECT r.id AS resource_id, r.count
             FROM projects p
             JOIN resources r ON r.project_id = p.id
             WHERE p.prefix = $1 AND r.name = $2",
        )
        .bind(prefix)
        .bind(resource_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn list_fields(&self, resource_id: i64) -> Result<Vec<FieldSpec>, DatabaseError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT name, type FROM fields WHERE resource_id = $1 ORDER BY position, id",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, field_type)| FieldSpec { name, field_type })
            .collect())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password)
             VALUES ($1, $2, $3)
             RETURNING id, name, email, password, created_at",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Email already registered"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let prefix = project.prefix.clone();
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (user_id, name, prefix)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, name, prefix, created_at",
        )
        .bind(project.user_id)
        .bind(&project.name)
        .bind(&project.prefix)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("Prefix '{}' is already in use", prefix)))
    }

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, user_id, name, prefix, created_at FROM projects WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_project(&self, user_id: i64, project_id: i64) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, user_id, name, prefix, created_at FROM projects WHERE id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, user_id: i64, project_id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(project_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        // Leaves first: fields, then resources, then the project row
        sqlx::query(
            "DELETE FROM fields WHERE resource_id IN (SELECT id FROM resources WHERE project_id = $1)",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM resources WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn create_resource(&self, resource: NewResource) -> Result<Resource, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Resource>(
            "INSERT INTO resources (project_id, name, count)
             VALUES ($1, $2, $3)
             RETURNING id, project_id, name, count, created_at",
        )
        .bind(resource.project_id)
        .bind(&resource.name)
        .bind(resource.count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            DatabaseError::from_write(e, format!("Resource '{}' already exists in this project", resource.name))
        })?;

        for (position, field) in resource.fields.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| DatabaseError::Conflict("Too many fields".to_string()))?;
            sqlx::query("INSERT INTO fields (resource_id, position, name, type) VALUES ($1, $2, $3, $4)")
                .bind(created.id)
                .bind(position)
                .bind(&field.name)
                .bind(&field.field_type)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn list_resources(&self, user_id: i64, prefix: &str) -> Result<Vec<ResourceSummary>, DatabaseError> {
        let resources = sqlx::query_as::<_, (i64, String, i32)>(
            "SELECT r.id, r.name, r.count
             FROM projects p
             JOIN resources r ON r.project_id = p.id
             WHERE p.prefix = $1 AND p.user_id = $2
             ORDER BY r.id",
        )
        .bind(prefix)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = resources.iter().map(|(id, _, _)| *id).collect();
        let fields = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT resource_id, name, type FROM fields
             WHERE resource_id = ANY($1)
             ORDER BY resource_id, position, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(resources
            .into_iter()
            .map(|(id, name, count)| ResourceSummary {
                id,
                name,
                count,
                fields: fields
                    .iter()
                    .filter(|(resource_id, _, _)| *resource_id == id)
                    .map(|(_, name, field_type)| FieldSpec::new(name.as_str(), field_type.as_str()))
                    .collect(),
            })
            .collect())
    }

    async fn delete_resource(&self, user_id: i64, resource_id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(i64,)> = sqlx::query_as(
            "SELECT r.id FROM resources r
             JOIN projects p ON p.id = r.project_id
             WHERE r.id = $1 AND p.user_id = $2
             FOR UPDATE OF r",
        )
        .bind(resource_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM fields WHERE resource_id = $1")
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
