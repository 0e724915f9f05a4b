use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded resume. Never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub owner_id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_text: String,
    /// Vector-store id. `None` when the vector was never persisted.
    pub embedding_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a resume; id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub owner_id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_text: String,
    pub embedding_id: Option<Uuid>,
}
