use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::config::config;
use crate::database::DatabaseManager;

/// Connect with DATABASE_URL and create any missing tables
pub async fn init(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    pool.close().await;

    utils::output_success(
        &output_format,
        "Database schema ready",
        Some(json!({ "tables": ["users", "projects", "resources", "fields"] })),
    )
}
