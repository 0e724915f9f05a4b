use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::repository::{MemoryRepository, PgRepository, Repository};

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Postgres with its schema ensured when a URL is given, else the in-memory repository.
pub async fn build_repository(database_url: Option<&str>) -> Result<Arc<dyn Repository>> {
    match database_url {
        Some(url) => {
            let repo = PgRepository::new(create_pool(url).await?);
            repo.ensure_schema().await?;
            Ok(Arc::new(repo))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory storage (data is lost on restart)");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}
