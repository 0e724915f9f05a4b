use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A suggested person to reach out to about a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub company: String,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub mutual_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub owner_id: String,
    pub resume_id: Uuid,
    pub job_description: String,
    pub job_title: Option<String>,
    pub match_score: f64,
    pub gap_analysis: Json<Vec<String>>,
    pub contacts: Json<Vec<Contact>>,
    pub email_draft: String,
    /// 1 for thumbs up, -1 for thumbs down.
    pub feedback_score: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobMatch {
    pub owner_id: String,
    pub resume_id: Uuid,
    pub job_description: String,
    pub job_title: Option<String>,
    pub match_score: f64,
    pub gap_analysis: Vec<String>,
    pub contacts: Vec<Contact>,
    pub email_draft: String,
}
