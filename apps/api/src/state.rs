use std::sync::Arc;

use crate::advisor::Advisor;
use crate::repository::Repository;
use crate::resumes::storage::FileStore;
use crate::search::vector_store::VectorStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres or in-memory, chosen from `DATABASE_URL`.
    pub repo: Arc<dyn Repository>,
    /// S3/MinIO or a local directory, chosen from `S3_BUCKET`.
    pub files: Arc<dyn FileStore>,
    pub vector_store: VectorStore,
    pub advisor: Advisor,
}
