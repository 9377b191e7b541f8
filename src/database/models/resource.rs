use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::generator::FieldSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub count: i32,
    pub created_at: DateTime<Utc>,
}

/// What the public generation endpoint needs to know about a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ResourceRef {
    pub resource_id: i64,
    pub count: i32,
}

impl ResourceRef {
    /// Record count as a length; a negative stored count yields no records
    pub fn record_count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }
}

/// A resource together with its ordered fields, as listed to its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: i64,
    pub name: String,
    pub count: i32,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub project_id: i64,
    pub name: String,
    pub count: i32,
    /// Stored with their index as `position`
    pub fields: Vec<FieldSpec>,
}
